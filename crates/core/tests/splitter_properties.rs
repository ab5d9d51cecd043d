//! Behavioral properties of the recursive splitter over realistic text

use zhsplit_core::splitter::{separator::default_separators, ChunkSizer, LengthUnit};
use zhsplit_core::{Document, FallbackMode, RecursiveSplitter, SplitterConfig, TextSplitter};

const PLATFORM_NOTES: &str = "\
平台用户管理：支持新增、修改、删除用户，并可分配角色和数据权限。停用后的账号将无法登录。
组织管理通过组织树维护机构信息，支持查询、新增、修改和删除操作，方便按本单位的结构灵活设置。

用户开户后会获得默认密码！系统支持定期修改密码，修改时校验原密码，并检查密码字符和长度是否合法？
开放接口：集成方可以根据授权获取接口信息，实现系统对接；也可以创建多个应用，分别获取密钥。

The platform exposes REST endpoints. Each request is authenticated! Tokens expire after an hour? Yes; refresh them early, or retry once.
1.《软件著作权登记证书》
2.《信息系统安全等级保护》第三级


3.《信创适配认证》";

fn config(chunk_size: usize, chunk_overlap: usize) -> SplitterConfig {
    SplitterConfig {
        chunk_size,
        chunk_overlap,
        ..Default::default()
    }
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn assert_normalized(chunks: &[String]) {
    for chunk in chunks {
        assert!(!chunk.is_empty());
        assert_eq!(chunk.trim(), chunk, "chunk has surrounding whitespace: {:?}", chunk);
        assert!(!chunk.contains("\n\n"), "chunk has a blank line: {:?}", chunk);
    }
}

#[test]
fn test_chunks_cover_input_in_order_without_overlap() {
    for chunk_size in [10, 25, 50, 120, 1000] {
        let splitter = RecursiveSplitter::new(config(chunk_size, 0)).unwrap();
        let chunks = splitter.split_text(PLATFORM_NOTES).unwrap();

        assert_normalized(&chunks);
        assert_eq!(
            without_whitespace(&chunks.concat()),
            without_whitespace(PLATFORM_NOTES),
            "chunk_size {}",
            chunk_size
        );
    }
}

#[test]
fn test_character_fallback_bounds_every_chunk() {
    let mut separators = default_separators();
    separators.push(String::new());

    for chunk_size in [2, 7, 20, 50] {
        let splitter = RecursiveSplitter::new(SplitterConfig {
            separators: separators.clone(),
            ..config(chunk_size, 0)
        })
        .unwrap();

        let chunks = splitter.split_text(PLATFORM_NOTES).unwrap();
        assert_normalized(&chunks);
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= chunk_size,
                "chunk of {} chars exceeds {}: {:?}",
                chunk.chars().count(),
                chunk_size,
                chunk
            );
        }
    }
}

#[test]
fn test_overlap_repeats_trailing_pieces() {
    let splitter = RecursiveSplitter::new(SplitterConfig {
        separators: vec!["，".to_string()],
        ..config(8, 4)
    })
    .unwrap();

    let chunks = splitter.split_text("一二，三四，五六，七八，").unwrap();
    assert_eq!(chunks, vec!["一二，三四，", "三四，五六，", "五六，七八，"]);
}

#[test]
fn test_whole_text_fits_in_one_chunk() {
    let splitter = RecursiveSplitter::new(config(10_000, 0)).unwrap();
    let chunks = splitter.split_text(PLATFORM_NOTES).unwrap();

    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].contains("\n\n"));
}

#[test]
fn test_degenerate_inputs_terminate() {
    let splitter = RecursiveSplitter::new(config(3, 0)).unwrap();

    let long_run = "字".repeat(500);
    let chunks = splitter.split_text(&long_run).unwrap();
    assert_eq!(chunks, vec![long_run.clone()]);

    let terminators = "。".repeat(40);
    let chunks = splitter.split_text(&terminators).unwrap();
    assert_eq!(without_whitespace(&chunks.concat()), terminators);

    assert!(splitter.split_text("\n\n\n\n").unwrap().is_empty());
    assert!(splitter.split_text(" \t ").unwrap().is_empty());
}

#[test]
fn test_characters_fallback_splits_unbroken_text() {
    let splitter = RecursiveSplitter::new(SplitterConfig {
        fallback: FallbackMode::Characters,
        ..config(10, 0)
    })
    .unwrap();

    let text = "字".repeat(25);
    let chunks = splitter.split_text(&text).unwrap();
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.chars().count() <= 10));
}

#[test]
fn test_length_units_change_boundaries() {
    let text = "第一句话。第二句话。第三句话。";

    let by_chars = RecursiveSplitter::new(config(12, 0))
        .unwrap()
        .split_text(text)
        .unwrap();
    let by_bytes = RecursiveSplitter::new(SplitterConfig {
        length_unit: LengthUnit::Bytes,
        ..config(36, 0)
    })
    .unwrap()
    .split_text(text)
    .unwrap();

    // 15 chars are 45 bytes; both limits allow two sentences per chunk
    assert_eq!(by_chars, vec!["第一句话。第二句话。", "第三句话。"]);
    assert_eq!(by_bytes, by_chars);

    assert_eq!(LengthUnit::Bytes.sizer().size("第一"), 6);
}

#[test]
fn test_split_documents_offsets_point_at_chunks() {
    let splitter = RecursiveSplitter::new(SplitterConfig {
        add_start_index: true,
        ..config(40, 0)
    })
    .unwrap();

    let document = Document::new("notes.txt", PLATFORM_NOTES);
    let chunks = splitter.split_documents(std::slice::from_ref(&document)).unwrap();
    let chars: Vec<char> = PLATFORM_NOTES.chars().collect();

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert_eq!(chunk.metadata.total_chunks, chunks.len());
        if let Some(start) = chunk.metadata.start_index {
            let found: String = chars[start..start + chunk.len()].iter().collect();
            assert_eq!(found, chunk.content);
        }
    }
    assert_eq!(chunks[0].metadata.start_index, Some(0));
}
