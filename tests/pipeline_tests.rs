use lsb_stego::pipeline::Stage;
use lsb_stego::{
    EmbeddedRecord, FailurePhase, StegoConfig, StegoError, StreamDecoder, StreamEncoder,
    decode_from_slice, encode_to_vec,
};
use rand::{Rng, RngCore};

/// 一个辅助函数，生成带有随机像素字节的载体 (54 字节头部 + `pixels` 字节)
fn random_carrier(pixels: usize) -> Vec<u8> {
    let mut carrier = vec![0u8; 54 + pixels];
    rand::rng().fill_bytes(&mut carrier);
    carrier[0] = b'B';
    carrier[1] = b'M';
    carrier
}

fn hello_record() -> EmbeddedRecord {
    StegoConfig::default().record(".txt", b"hello".to_vec())
}

/// 10,000 字节的载体隐藏 "hello" 后可以完整恢复
#[test]
fn test_hello_round_trip() {
    let carrier = random_carrier(10_000);

    let (stego, summary) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");
    assert_eq!(summary.embedded, 184);
    assert_eq!(summary.passthrough, 10_000 - 184);
    assert_eq!(stego.len(), carrier.len());

    let record = decode_from_slice(&stego, StegoConfig::default()).expect("decode");
    assert_eq!(record.magic, b"#*");
    assert_eq!(record.extension, b".txt");
    assert_eq!(record.payload, b"hello");
    assert_eq!(record.extension_str().expect("valid extension"), ".txt");
}

/// 随机载荷 (包括空载荷) 都能往返
#[test]
fn test_random_payload_round_trip() {
    let mut rng = rand::rng();
    for len in [0usize, 1, 7, 100, 1_000] {
        let mut payload = vec![0u8; len];
        rng.fill_bytes(&mut payload);
        let carrier = random_carrier(8 * (len + 64) + rng.random_range(1..500));

        let config = StegoConfig::default();
        let record = config.record(".bin", payload.clone());
        let (stego, _) = encode_to_vec(&carrier, &record, config.clone()).expect("encode");
        let decoded = decode_from_slice(&stego, config).expect("decode");

        assert_eq!(decoded.payload, payload, "payload of {len} bytes");
        assert_eq!(decoded.extension, b".bin");
    }
}

/// 头部原样保留，记录之后的字节原样复制，记录区域只有最低位可能改变
#[test]
fn test_header_and_tail_are_preserved() {
    let carrier = random_carrier(2_000);
    let (stego, summary) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");

    assert_eq!(stego[..54], carrier[..54]);

    let tail_start = 54 + summary.embedded as usize;
    assert_eq!(stego[tail_start..], carrier[tail_start..]);

    for (before, after) in carrier.iter().zip(stego.iter()) {
        assert_eq!(before & 0xFE, after & 0xFE);
    }
}

/// 检查嵌入记录的逐位布局
#[test]
fn test_embedded_layout_is_bit_exact() {
    let carrier = vec![0u8; 54 + 400];
    let (stego, _) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");
    let bits: Vec<u8> = stego[54..].iter().map(|b| b & 1).collect();

    // 魔数长度 2
    assert!(bits[..30].iter().all(|&b| b == 0));
    assert_eq!(bits[30..32], [1, 0]);
    // '#' = 0x23, '*' = 0x2A
    assert_eq!(bits[32..40], [0, 0, 1, 0, 0, 0, 1, 1]);
    assert_eq!(bits[40..48], [0, 0, 1, 0, 1, 0, 1, 0]);
    // 扩展名长度 4
    assert_eq!(bits[48 + 29..48 + 32], [1, 0, 0]);
    // 载荷长度 5，位于 48 + 32 + 32 之后
    let size_start = 48 + 32 + 32;
    assert_eq!(bits[size_start + 29..size_start + 32], [1, 0, 1]);
    // 载荷之后的字节不受影响
    assert!(bits[184..].iter().all(|&b| b == 0));
}

/// 容量恰好等于需求时失败，且没有任何字节写入目标
#[test]
fn test_capacity_boundary_writes_nothing() {
    let carrier = random_carrier(184);
    let mut stego = Vec::new();

    let result = StreamEncoder::new(
        carrier.as_slice(),
        carrier.len() as u64,
        &mut stego,
        StegoConfig::default(),
    )
    .encode(&hello_record());

    match result {
        Err(e @ StegoError::InsufficientCapacity { .. }) => {
            assert_eq!(e.phase(), FailurePhase::Setup)
        }
        other => panic!("expected InsufficientCapacity, got {:?}", other.map(|(_, s)| s)),
    }
    assert!(stego.is_empty());

    let carrier = random_carrier(185);
    let (stego, summary) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("one spare byte");
    assert_eq!(summary.passthrough, 1);
    assert_eq!(stego.last(), carrier.last());
}

/// 100 字节的载体无法隐藏 50 字节的载荷
#[test]
fn test_small_carrier_is_rejected() {
    let carrier = random_carrier(46);
    let config = StegoConfig::default();
    let record = config.record(".txt", vec![b'a'; 50]);

    let result = encode_to_vec(&carrier, &record, config);
    assert!(matches!(
        result,
        Err(StegoError::InsufficientCapacity { available: 100, .. })
    ));
}

#[test]
fn test_payload_limit_is_enforced_before_writing() {
    let carrier = random_carrier(10_000);
    let config = StegoConfig::default().with_max_payload_len(Some(4));
    let mut stego = Vec::new();

    let result = StreamEncoder::new(carrier.as_slice(), carrier.len() as u64, &mut stego, config)
        .encode(&hello_record());

    match result {
        Err(
            e @ StegoError::PayloadTooLarge {
                stage: Stage::CapacityCheck,
                len: 5,
                limit: 4,
            },
        ) => assert_eq!(e.phase(), FailurePhase::Setup),
        other => panic!("expected PayloadTooLarge, got {:?}", other.map(|(_, s)| s)),
    }
    assert!(stego.is_empty());
}

/// 载体流比声明的长度短时，编码在载荷步骤报告短读
#[test]
fn test_encoder_reports_short_carrier() {
    let carrier = random_carrier(146);
    let mut stego = Vec::new();

    let result = StreamEncoder::new(carrier.as_slice(), 10_000, &mut stego, StegoConfig::default())
        .encode(&hello_record());

    match result {
        Err(e @ StegoError::ShortRead { .. }) => {
            assert_eq!(e.phase(), FailurePhase::MidStream);
            assert!(matches!(
                e,
                StegoError::ShortRead {
                    stage: Stage::Payload,
                    expected: 8,
                    actual: 2,
                }
            ));
        }
        other => panic!("expected ShortRead, got {:?}", other.map(|(_, s)| s)),
    }
}

#[test]
fn test_decoder_reports_short_header() {
    let stego = vec![0u8; 20];
    let result = decode_from_slice(&stego, StegoConfig::default());
    assert!(matches!(
        result,
        Err(StegoError::ShortRead {
            stage: Stage::HeaderSkip,
            expected: 54,
            actual: 20,
        })
    ));
}

/// 截断在各个字段中间的隐写图像，短读报告所在的步骤
#[test]
fn test_decoder_reports_stage_of_truncation() {
    let carrier = random_carrier(10_000);
    let (stego, _) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");

    // 头部之后：魔数长度 [0, 32)，魔数 [32, 48)，扩展名长度 [48, 80)，
    // 扩展名 [80, 112)，载荷长度 [112, 144)
    let cases = [
        (10, Stage::Magic, 32, 10),
        (44, Stage::Magic, 8, 4),
        (60, Stage::Extension, 32, 12),
        (83, Stage::Extension, 8, 3),
        (130, Stage::Size, 32, 18),
    ];

    for (cut, stage, expected, actual) in cases {
        let err = decode_from_slice(&stego[..54 + cut], StegoConfig::default())
            .expect_err("truncated stego image must not decode");
        assert_eq!(err.phase(), FailurePhase::MidStream, "cut at {cut}");
        match err {
            StegoError::ShortRead {
                stage: s,
                expected: x,
                actual: a,
            } => assert_eq!((s, x, a), (stage, expected, actual), "cut at {cut}"),
            other => panic!("cut at {cut}: expected ShortRead, got {other:?}"),
        }
    }
}

/// 截断在载荷中间的隐写图像解码失败
#[test]
fn test_decoder_reports_truncated_payload() {
    let carrier = random_carrier(10_000);
    let (stego, _) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");

    let result = decode_from_slice(&stego[..54 + 150], StegoConfig::default());
    assert!(matches!(
        result,
        Err(StegoError::ShortRead {
            stage: Stage::Payload,
            ..
        })
    ));
}

/// 魔数不符时默认报错，关闭校验后仍然解码
#[test]
fn test_magic_verification() {
    let carrier = random_carrier(10_000);
    let (stego, _) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");

    let strict = StegoConfig::default().with_magic("XY");
    match decode_from_slice(&stego, strict.clone()) {
        Err(StegoError::MagicMismatch { expected, actual }) => {
            assert_eq!(expected, b"XY");
            assert_eq!(actual, b"#*");
        }
        other => panic!("expected MagicMismatch, got {other:?}"),
    }

    let lenient = strict.with_verify_magic(false);
    let record = decode_from_slice(&stego, lenient).expect("decode without verification");
    assert_eq!(record.magic, b"#*");
    assert_eq!(record.payload, b"hello");
}

/// 未经隐写的图像 (全零像素) 被识别为魔数不符
#[test]
fn test_plain_image_is_not_mistaken_for_stego() {
    let plain = vec![0u8; 54 + 1_000];
    let result = decode_from_slice(&plain, StegoConfig::default());
    assert!(matches!(
        result,
        Err(StegoError::MagicMismatch { ref actual, .. }) if actual.is_empty()
    ));
}

#[test]
fn test_decoder_enforces_payload_limit() {
    let carrier = random_carrier(10_000);
    let (stego, _) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");

    // 超限在读完长度字段之后才被发现，属于中途失败
    let config = StegoConfig::default().with_max_payload_len(Some(4));
    match decode_from_slice(&stego, config) {
        Err(
            e @ StegoError::PayloadTooLarge {
                stage: Stage::Size,
                len: 5,
                limit: 4,
            },
        ) => assert_eq!(e.phase(), FailurePhase::MidStream),
        other => panic!("expected PayloadTooLarge, got {other:?}"),
    }
}

#[test]
fn test_decode_into_writes_payload() {
    let carrier = random_carrier(10_000);
    let (stego, _) =
        encode_to_vec(&carrier, &hello_record(), StegoConfig::default()).expect("encode");

    let mut output = Vec::new();
    let record = StreamDecoder::new(stego.as_slice(), StegoConfig::default())
        .decode_into(&mut output)
        .expect("decode");
    assert_eq!(output, b"hello");
    assert_eq!(record.extension, b".txt");
}

#[test]
fn test_untrusted_extension_is_rejected() {
    let carrier = random_carrier(10_000);
    let config = StegoConfig::default();
    let record = config.record("/../etc", b"x".to_vec());
    let (stego, _) = encode_to_vec(&carrier, &record, config.clone()).expect("encode");

    let decoded = decode_from_slice(&stego, config).expect("decode");
    match decoded.extension_str() {
        Err(e @ StegoError::InvalidExtension { stage: Stage::Extension, .. }) => {
            assert_eq!(e.phase(), FailurePhase::MidStream)
        }
        other => panic!("expected InvalidExtension, got {other:?}"),
    }
}
