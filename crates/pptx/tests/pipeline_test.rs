use deck_core::{Chunk, DeckConfig, Language, SlideRecord, SseChunks};
use deck_pptx::{DeckPipeline, PptxReader};
use std::fs::File;

fn config(dir: &std::path::Path) -> DeckConfig {
    DeckConfig::new().with_export_dir(dir.join("exports"))
}

#[test]
fn test_cover_contents_end_in_english() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = DeckPipeline::from_config(&config(dir.path())).unwrap();

    let records = vec![
        SlideRecord::Cover {
            title: "A".to_string(),
            subtitle: None,
        },
        SlideRecord::Contents {
            items: vec!["x".to_string(), "y".to_string()],
        },
        SlideRecord::End,
    ];
    let exported = pipeline
        .from_records(&records, "通用", Language::English)
        .unwrap();
    assert_eq!(exported.pages, 3);

    let slides = PptxReader::new()
        .read(File::open(&exported.path).unwrap())
        .unwrap();
    assert_eq!(slides.len(), 3);
    assert_eq!(slides[0].texts(), vec!["A"]);
    assert_eq!(slides[1].texts(), vec!["Contents", "x\ny"]);
    assert_eq!(slides[2].texts(), vec!["Thank you"]);
}

#[test]
fn test_rapid_exports_get_distinct_references() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = DeckPipeline::from_config(&config(dir.path())).unwrap();

    let first = pipeline
        .from_records(&[SlideRecord::End], "通用", Language::Chinese)
        .unwrap();
    let second = pipeline
        .from_records(&[SlideRecord::End], "通用", Language::Chinese)
        .unwrap();
    assert_ne!(first.url, second.url);

    let files: Vec<String> = std::fs::read_dir(dir.path().join("exports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|name| name.starts_with("aippt_") && name.ends_with(".pptx")));
}

#[test]
fn test_sse_stream_to_deck() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = DeckPipeline::from_config(&config(dir.path())).unwrap();

    let frame = |content: &str| {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    };
    let raw = vec![
        frame("{\"type\":\"cover\",\"data\":{\"title\":\"Streams\"}}\n{\"type\":"),
        frame("\"end\"}\n"),
        "data: [DONE]\n\n".to_string(),
    ];

    let chunks: Vec<Chunk> = SseChunks::new(raw.into_iter()).collect();
    let exported = pipeline
        .from_chunks(chunks, "教育风", Language::English)
        .unwrap();

    let slides = PptxReader::new()
        .read(File::open(&exported.path).unwrap())
        .unwrap();
    assert_eq!(slides[0].texts(), vec!["Streams"]);
    assert_eq!(slides[1].texts(), vec!["Thank you"]);
}
