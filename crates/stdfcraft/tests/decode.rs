use stdfcraft::{
    errors::{LookupError, ReadError},
    reader::Endianness,
    record::DecodeStatus,
    registry::Registry,
    value::Value,
};

/// Builds a record payload in a given byte order.
struct Payload {
    endianness: Endianness,
    bytes: Vec<u8>,
}

impl Payload {
    fn new(endianness: Endianness) -> Self {
        Payload {
            endianness,
            bytes: Vec::new(),
        }
    }

    fn u1(mut self, v: u8) -> Self {
        self.bytes.push(v);
        self
    }

    fn i1(self, v: i8) -> Self {
        self.u1(v as u8)
    }

    fn u2(mut self, v: u16) -> Self {
        match self.endianness {
            Endianness::Big => self.bytes.extend_from_slice(&v.to_be_bytes()),
            Endianness::Little => self.bytes.extend_from_slice(&v.to_le_bytes()),
        }
        self
    }

    fn u4(mut self, v: u32) -> Self {
        match self.endianness {
            Endianness::Big => self.bytes.extend_from_slice(&v.to_be_bytes()),
            Endianness::Little => self.bytes.extend_from_slice(&v.to_le_bytes()),
        }
        self
    }

    fn r4(mut self, v: f32) -> Self {
        match self.endianness {
            Endianness::Big => self.bytes.extend_from_slice(&v.to_be_bytes()),
            Endianness::Little => self.bytes.extend_from_slice(&v.to_le_bytes()),
        }
        self
    }

    fn cn(mut self, s: &str) -> Self {
        self.bytes.push(s.len() as u8);
        self.bytes.extend_from_slice(s.as_bytes());
        self
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    fn build(self) -> Vec<u8> {
        self.bytes
    }
}

fn text(s: &str) -> Value {
    Value::Str(s.to_string())
}

fn ptr_payload(endianness: Endianness) -> Vec<u8> {
    Payload::new(endianness)
        .u4(1000)
        .u1(1)
        .u1(2)
        .u1(0b0000_0010) // test_flg: bit 1 set, result invalid
        .u1(0)
        .r4(1.5)
        .cn("VDD")
        .cn("")
        .u1(0b0101_0000) // opt_flag: bits 4 and 6 set, no low limit
        .i1(-3)
        .i1(0)
        .i1(2)
        .r4(0.0)
        .r4(2.5)
        .cn("V")
        .cn("")
        .build()
}

#[test]
fn test_ptr_header_fields_and_absent_tail() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u4(7)
        .u1(1)
        .u1(4)
        .u1(0)
        .build();

    let record = registry
        .decode(15, 10, &payload, Endianness::Little)
        .unwrap();

    assert!(record.is_complete());
    assert_eq!(
        record.present().collect::<Vec<_>>(),
        vec!["test_num", "head_num", "site_num", "test_flg"]
    );
    assert_eq!(record.get("test_num"), Some(&Value::Int(7)));
    assert_eq!(record.get("test_flg"), Some(&text("00000000")));
    assert_eq!(record.get("parm_flg"), Some(&Value::Absent));
    assert_eq!(record.get("hi_spec"), Some(&Value::Absent));
}

#[test]
fn test_ptr_missing_rules() {
    let registry = Registry::stdf_v4().unwrap();

    for endianness in [Endianness::Little, Endianness::Big] {
        let payload = ptr_payload(endianness);
        let record = registry.decode(15, 10, &payload, endianness).unwrap();

        assert!(record.is_complete());
        assert_eq!(record.get("test_num"), Some(&Value::Int(1000)));
        assert_eq!(record.get("result"), Some(&Value::Absent));
        assert_eq!(record.get("test_txt"), Some(&text("VDD")));
        assert_eq!(record.get("alarm_id"), Some(&Value::Absent));
        assert_eq!(record.get("opt_flag"), Some(&text("01010000")));
        assert_eq!(record.get("res_scal"), Some(&Value::Int(-3)));
        assert_eq!(record.get("llm_scal"), Some(&Value::Absent));
        assert_eq!(record.get("hlm_scal"), Some(&Value::Int(2)));
        assert_eq!(record.get("lo_limit"), Some(&Value::Absent));
        assert_eq!(record.get("hi_limit"), Some(&Value::Float(2.5)));
        assert_eq!(record.get("units"), Some(&text("V")));
        assert_eq!(record.get("c_resfmt"), Some(&Value::Absent));
        assert_eq!(record.get("c_llmfmt"), Some(&Value::Absent));
    }
}

#[test]
fn test_ptr_truncated_inside_result() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u4(1)
        .u1(1)
        .u1(1)
        .u1(0)
        .u1(0)
        .raw(&[0x00, 0x00])
        .build();

    let record = registry
        .decode(15, 10, &payload, Endianness::Little)
        .unwrap();

    assert_eq!(
        record.status(),
        &DecodeStatus::Truncated {
            field: "result".to_string(),
            error: ReadError::OutOfBounds {
                offset: 8,
                needed: 4,
                available: 2,
            },
        }
    );
    assert_eq!(record.get("parm_flg"), Some(&text("00000000")));
    assert_eq!(record.get("result"), Some(&Value::Absent));
}

#[test]
fn test_mpr_arrays_follow_counts() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u4(20)
        .u1(1)
        .u1(1)
        .u1(0)
        .u1(0)
        .u2(3) // rtn_icnt
        .u2(2) // rslt_cnt
        .raw(&[0x21, 0x03]) // three nibbles
        .r4(1.0)
        .r4(-0.5)
        .cn("")
        .build();

    let record = registry
        .decode(15, 15, &payload, Endianness::Little)
        .unwrap();

    assert!(record.is_complete());
    assert_eq!(
        record.get("rtn_stat"),
        Some(&Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
    );
    assert_eq!(
        record.get("rtn_rslt"),
        Some(&Value::Array(vec![Value::Float(1.0), Value::Float(-0.5)]))
    );
    assert_eq!(record.get("test_txt"), Some(&Value::Absent));
    assert_eq!(record.get("rtn_rslt").unwrap().to_string(), "1.0,-0.5");
}

#[test]
fn test_mpr_zero_counts_are_absent() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Big)
        .u4(20)
        .u1(1)
        .u1(1)
        .u1(0)
        .u1(0)
        .u2(0)
        .u2(1)
        .r4(4.0)
        .cn("mpr")
        .build();

    let record = registry.decode(15, 15, &payload, Endianness::Big).unwrap();

    assert_eq!(record.get("rtn_icnt"), Some(&Value::Int(0)));
    assert_eq!(record.get("rtn_stat"), Some(&Value::Absent));
    assert_eq!(record.get("rtn_rslt"), Some(&Value::Array(vec![Value::Float(4.0)])));
    assert_eq!(record.get("test_txt"), Some(&text("mpr")));
}

#[test]
fn test_ftr_fail_pin_positions() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u4(5)
        .u1(1)
        .u1(1)
        .u1(0)
        .u1(0b0011_1111) // opt_flag: every optional count invalid
        .raw(&[0; 26])
        .u2(0) // rtn_icnt
        .u2(0) // pgm_icnt
        .u2(16)
        .raw(&[0x01, 0x81])
        .cn("vec1")
        .build();

    let record = registry
        .decode(15, 20, &payload, Endianness::Little)
        .unwrap();

    assert!(record.is_complete());
    assert_eq!(record.get("cycl_cnt"), Some(&Value::Absent));
    assert_eq!(record.get("vect_off"), Some(&Value::Absent));
    assert_eq!(record.get("rtn_indx"), Some(&Value::Absent));
    assert_eq!(record.get("pgm_stat"), Some(&Value::Absent));
    assert_eq!(record.get("fail_pin"), Some(&Value::Positions(vec![1, 9, 16])));
    assert_eq!(record.get("fail_pin").unwrap().to_string(), "1,9,16");
    assert_eq!(record.get("vect_nam"), Some(&text("vec1")));
}

#[test]
fn test_gdr_generic_data() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u2(4)
        .raw(&[1, 7]) // U*1
        .raw(&[0]) // pad
        .raw(&[10, 2, b'h', b'i']) // C*n
        .raw(&[11, 2, 0x00, 0x1F]) // B*n
        .build();

    let record = registry
        .decode(50, 10, &payload, Endianness::Little)
        .unwrap();

    assert!(record.is_complete());
    assert_eq!(
        record.get("gen_data"),
        Some(&Value::Array(vec![text("U7"), text("Thi"), text("X1F")]))
    );
}

#[test]
fn test_gdr_unknown_type_code_truncates() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u2(2)
        .raw(&[1, 5])
        .raw(&[9, 0xAA, 0xBB])
        .build();

    let record = registry
        .decode(50, 10, &payload, Endianness::Little)
        .unwrap();

    assert_eq!(record.get("fld_cnt"), Some(&Value::Int(2)));
    assert_eq!(record.get("gen_data"), Some(&Value::Absent));
    assert_eq!(
        record.status(),
        &DecodeStatus::Truncated {
            field: "gen_data".to_string(),
            error: ReadError::UnknownVariableType { code: 9, offset: 4 },
        }
    );
}

#[test]
fn test_plr_string_arrays() {
    let registry = Registry::stdf_v4().unwrap();
    let schema = registry.resolve_name("PLR").unwrap();
    assert_eq!(schema.kind(), (1, 63));

    let payload = Payload::new(Endianness::Little)
        .u2(2) // grp_cnt
        .u2(1)
        .u2(2) // grp_indx
        .u2(0)
        .u2(0) // grp_mode
        .u1(2)
        .u1(6) // grp_radx
        .cn("H")
        .cn("L") // pgm_char
        .build();

    let record = schema.decode(&payload, Endianness::Little);

    assert!(record.is_complete());
    assert_eq!(
        record.get("grp_indx"),
        Some(&Value::Array(vec![Value::Int(1), Value::Int(2)]))
    );
    assert_eq!(
        record.get("pgm_char"),
        Some(&Value::Array(vec![text("H"), text("L")]))
    );
    assert_eq!(record.get("rtn_char"), Some(&Value::Absent));
}

#[test]
fn test_mir_blank_and_sentinel() {
    let registry = Registry::stdf_v4().unwrap();
    let payload = Payload::new(Endianness::Little)
        .u4(1_600_000_000)
        .u4(1_600_000_100)
        .u1(1)
        .raw(b"P ") // mode_cod, rtst_cod
        .raw(b" ") // prot_cod
        .u2(65535) // burn_tim
        .raw(b"A")
        .cn("LOT1")
        .build();

    let record = registry.decode(1, 10, &payload, Endianness::Little).unwrap();

    assert_eq!(record.get("mode_cod"), Some(&text("P")));
    assert_eq!(record.get("rtst_cod"), Some(&Value::Absent));
    assert_eq!(record.get("prot_cod"), Some(&Value::Absent));
    assert_eq!(record.get("burn_tim"), Some(&Value::Absent));
    assert_eq!(record.get("cmod_cod"), Some(&text("A")));
    assert_eq!(record.get("lot_id"), Some(&text("LOT1")));
}

#[test]
fn test_unknown_record_kind() {
    let registry = Registry::stdf_v4().unwrap();
    assert_eq!(
        registry.decode(200, 1, &[], Endianness::Little).unwrap_err(),
        LookupError::NotFoundKind {
            rec_typ: 200,
            rec_sub: 1
        }
    );
}

#[test]
fn test_concurrent_decodes_share_schemas() {
    let registry = Registry::stdf_v4().unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let registry = &registry;
                scope.spawn(move || {
                    let endianness = if i % 2 == 0 {
                        Endianness::Little
                    } else {
                        Endianness::Big
                    };
                    let payload = Payload::new(endianness)
                        .u4(i)
                        .u1(1)
                        .u1(i as u8)
                        .u1(0)
                        .u1(0)
                        .r4(i as f32)
                        .build();
                    let record = registry.decode(15, 10, &payload, endianness).unwrap();
                    (
                        record.get("test_num").cloned(),
                        record.get("result").cloned(),
                    )
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let (test_num, result) = handle.join().unwrap();
            assert_eq!(test_num, Some(Value::Int(i as i64)));
            assert_eq!(result, Some(Value::Float(i as f64)));
        }
    });
}
