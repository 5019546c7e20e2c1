use std::io::Cursor;

use stdfcraft::{
    reader::Endianness,
    registry::Registry,
    stream::{RecordHeader, RecordStream, StreamError, detect_endianness},
    value::Value,
};

fn little_endian_file() -> Vec<u8> {
    let mut file = vec![2, 0, 0, 10, 2, 4]; // FAR, cpu_type 2
    file.extend_from_slice(&[2, 0, 5, 10, 1, 3]); // PIR
    file.extend_from_slice(&[4, 0, 50, 30, 3, b'a', b'b', b'c']); // DTR
    file
}

fn big_endian_file() -> Vec<u8> {
    let mut file = vec![0, 2, 0, 10, 1, 4]; // FAR, cpu_type 1
    file.extend_from_slice(&[0, 6, 1, 70, 0, 2, 0x01, 0x02, 0x00, 0x07]); // RDR
    file
}

#[test]
fn test_stream_little_endian() {
    let registry = Registry::stdf_v4().unwrap();
    let mut stream = RecordStream::open(Cursor::new(little_endian_file())).unwrap();
    assert_eq!(stream.endianness(), Endianness::Little);

    let records: Vec<_> = stream.by_ref().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.offset).collect::<Vec<_>>(),
        vec![0, 6, 12]
    );

    let far = records[0].decode(&registry, stream.endianness()).unwrap();
    assert_eq!(far.kind(), "FAR");
    assert_eq!(far.get("cpu_type"), Some(&Value::Int(2)));
    assert_eq!(far.get("stdf_ver"), Some(&Value::Int(4)));

    let pir = records[1].decode(&registry, stream.endianness()).unwrap();
    assert_eq!(pir.get("site_num"), Some(&Value::Int(3)));

    let dtr = records[2].decode(&registry, stream.endianness()).unwrap();
    assert_eq!(dtr.get("text_dat"), Some(&Value::Str("abc".to_string())));

    assert!(stream.next_record().unwrap().is_none());
}

#[test]
fn test_stream_big_endian() {
    let registry = Registry::stdf_v4().unwrap();
    let mut stream = RecordStream::open(Cursor::new(big_endian_file())).unwrap();
    assert_eq!(stream.endianness(), Endianness::Big);

    let far = stream.next_record().unwrap().unwrap();
    assert_eq!(
        far.header,
        RecordHeader {
            rec_len: 2,
            rec_typ: 0,
            rec_sub: 10
        }
    );

    let rdr = stream.next_record().unwrap().unwrap();
    assert_eq!(rdr.header.rec_len, 6);
    let record = rdr.decode(&registry, stream.endianness()).unwrap();
    assert_eq!(
        record.get("rtst_bin"),
        Some(&Value::Array(vec![Value::Int(0x0102), Value::Int(7)]))
    );

    assert!(stream.next().is_none());
}

#[test]
fn test_stream_with_known_endianness() {
    let file = little_endian_file();
    let stream = RecordStream::new(&file[6..], Endianness::Little);
    let kinds: Vec<_> = stream.map(|r| r.unwrap().header.kind()).collect();
    assert_eq!(kinds, vec![(5, 10), (50, 30)]);
}

#[test]
fn test_stream_short_payload() {
    let mut file: Vec<u8> = vec![2, 0, 0, 10, 2, 4];
    file.extend_from_slice(&[5, 0, 5, 10, 1]);

    let mut stream = RecordStream::open(Cursor::new(file)).unwrap();
    assert!(stream.next_record().unwrap().is_some());

    match stream.next_record() {
        Err(StreamError::ShortPayload {
            rec_typ,
            rec_sub,
            offset,
            expected,
            got,
        }) => {
            assert_eq!((rec_typ, rec_sub), (5, 10));
            assert_eq!(offset, 6);
            assert_eq!((expected, got), (5, 1));
        }
        other => panic!("expected short payload, got {other:?}"),
    }
    assert!(stream.next_record().unwrap().is_none());
}

#[test]
fn test_stream_incomplete_trailing_header() {
    let mut file = little_endian_file();
    file.extend_from_slice(&[1, 0]);

    let stream = RecordStream::open(Cursor::new(file)).unwrap();
    let records: Vec<_> = stream.collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn test_stream_empty_input() {
    let mut stream = RecordStream::open(Cursor::new(Vec::<u8>::new())).unwrap();
    assert!(stream.next_record().unwrap().is_none());
}

#[test]
fn test_stream_empty_first_payload() {
    // FAR with no payload: the probed byte belongs to the next header.
    let file: Vec<u8> = vec![0, 0, 0, 10, 2, 0, 5, 10, 1, 3];

    let stream = RecordStream::open(Cursor::new(file)).unwrap();
    let records: Vec<_> = stream.collect::<Result<_, _>>().unwrap();

    assert_eq!(records.len(), 2);
    assert!(records[0].payload.is_empty());
    assert_eq!(records[1].header.kind(), (5, 10));
    assert_eq!(records[1].offset, 4);
    assert_eq!(records[1].payload, vec![1, 3]);
}

#[test]
fn test_open_agrees_with_detect_endianness() {
    for file in [little_endian_file(), big_endian_file()] {
        let stream = RecordStream::open(Cursor::new(file.clone())).unwrap();
        assert_eq!(detect_endianness(&file), Some(stream.endianness()));
    }
}

#[test]
fn test_open_without_cpu_type() {
    let file: Vec<u8> = vec![2, 0, 0, 10];

    match RecordStream::open(Cursor::new(file)) {
        Err(StreamError::ShortPayload { expected, got, .. }) => {
            assert_eq!((expected, got), (2, 0));
        }
        other => panic!("expected short payload, got {:?}", other.map(|s| s.endianness())),
    }
}
