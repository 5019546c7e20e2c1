//! Built-in STDF V4 record tables.
//!
//! Missing-value rules are kept as text here and parsed once when a
//! [crate::registry::Registry] is built from these tables.

use crate::{
    errors::CompileError,
    field::Field,
    missing::MissingRule,
    schema::Schema,
    wire::WireType::{self, *},
};

pub(crate) struct FieldSpec {
    name: &'static str,
    wire: WireType,
    array_len: Option<&'static str>,
    missing: &'static str,
}

pub(crate) struct RecordSpec {
    name: &'static str,
    rec_typ: u8,
    rec_sub: u8,
    fields: &'static [FieldSpec],
}

const fn f(name: &'static str, wire: WireType, missing: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        wire,
        array_len: None,
        missing,
    }
}

const fn a(
    name: &'static str,
    wire: WireType,
    array_len: &'static str,
    missing: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        wire,
        array_len: Some(array_len),
        missing,
    }
}

const fn r(
    name: &'static str,
    rec_typ: u8,
    rec_sub: u8,
    fields: &'static [FieldSpec],
) -> RecordSpec {
    RecordSpec {
        name,
        rec_typ,
        rec_sub,
        fields,
    }
}

impl FieldSpec {
    fn to_field(&self) -> Result<Field, CompileError> {
        let missing =
            MissingRule::parse(self.missing).ok_or_else(|| CompileError::InvalidMissingRule {
                field: self.name.to_string(),
                rule: self.missing.to_string(),
            })?;

        let mut field = Field::new(self.name, self.wire).with_missing(missing);
        if let Some(count_field) = self.array_len {
            field = field.with_array_len(count_field);
        }

        Ok(field)
    }
}

impl RecordSpec {
    pub(crate) fn compile(&self) -> Result<Schema, CompileError> {
        let fields = self
            .fields
            .iter()
            .map(FieldSpec::to_field)
            .collect::<Result<Vec<_>, _>>()?;

        Schema::compile(self.name, self.rec_typ, self.rec_sub, &fields)
    }
}

const FAR: &[FieldSpec] = &[
    f("cpu_type", U1, ""),
    f("stdf_ver", U1, ""),
];

const ATR: &[FieldSpec] = &[
    f("mod_tim", U4, ""),
    f("cmd_line", Cn, ""),
];

const MIR: &[FieldSpec] = &[
    f("setup_t", U4, ""),
    f("start_t", U4, ""),
    f("stat_num", U1, ""),
    f("mode_cod", C1, "space"),
    f("rtst_cod", C1, "space"),
    f("prot_cod", C1, "space"),
    f("burn_tim", U2, "65535"),
    f("cmod_cod", C1, "space"),
    f("lot_id", Cn, ""),
    f("part_typ", Cn, ""),
    f("node_nam", Cn, ""),
    f("tstr_typ", Cn, ""),
    f("job_nam", Cn, ""),
    f("job_rev", Cn, "length byte = 0"),
    f("sblot_id", Cn, "length byte = 0"),
    f("oper_nam", Cn, "length byte = 0"),
    f("exec_typ", Cn, "length byte = 0"),
    f("exec_ver", Cn, "length byte = 0"),
    f("test_cod", Cn, "length byte = 0"),
    f("tst_temp", Cn, "length byte = 0"),
    f("user_txt", Cn, "length byte = 0"),
    f("aux_file", Cn, "length byte = 0"),
    f("pkg_typ", Cn, "length byte = 0"),
    f("famly_id", Cn, "length byte = 0"),
    f("date_cod", Cn, "length byte = 0"),
    f("facil_id", Cn, "length byte = 0"),
    f("floor_id", Cn, "length byte = 0"),
    f("proc_id", Cn, "length byte = 0"),
    f("oper_frq", Cn, "length byte = 0"),
    f("spec_nam", Cn, "length byte = 0"),
    f("spec_ver", Cn, "length byte = 0"),
    f("flow_id", Cn, "length byte = 0"),
    f("setup_id", Cn, "length byte = 0"),
    f("dsgn_rev", Cn, "length byte = 0"),
    f("eng_id", Cn, "length byte = 0"),
    f("rom_cod", Cn, "length byte = 0"),
    f("serl_num", Cn, "length byte = 0"),
    f("supr_nam", Cn, "length byte = 0"),
];

const MRR: &[FieldSpec] = &[
    f("finish_t", U4, ""),
    f("disp_cod", C1, "space"),
    f("usr_desc", Cn, "length byte = 0"),
    f("exc_desc", Cn, "length byte = 0"),
];

const PCR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("part_cnt", U4, ""),
    f("rtst_cnt", U4, "4294967295"),
    f("abrt_cnt", U4, "4294967295"),
    f("good_cnt", U4, "4294967295"),
    f("func_cnt", U4, "4294967295"),
];

const HBR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("hbin_num", U2, ""),
    f("hbin_cnt", U4, ""),
    f("hbin_pf", C1, "space"),
    f("hbin_nam", Cn, "length byte = 0"),
];

const SBR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("sbin_num", U2, ""),
    f("sbin_cnt", U4, ""),
    f("sbin_pf", C1, "space"),
    f("sbin_nam", Cn, "length byte = 0"),
];

const PMR: &[FieldSpec] = &[
    f("pmr_indx", U2, ""),
    f("chan_typ", U2, "0"),
    f("chan_nam", Cn, "length byte = 0"),
    f("phy_nam", Cn, "length byte = 0"),
    f("log_nam", Cn, "length byte = 0"),
    f("head_num", U1, ""),
    f("site_num", U1, ""),
];

const PGR: &[FieldSpec] = &[
    f("grp_indx", U2, ""),
    f("grp_nam", Cn, "length byte = 0"),
    f("indx_cnt", U2, ""),
    a("pmr_indx", XU2, "indx_cnt", "indx_cnt = 0"),
];

const PLR: &[FieldSpec] = &[
    f("grp_cnt", U2, ""),
    a("grp_indx", XU2, "grp_cnt", ""),
    a("grp_mode", XU2, "grp_cnt", "0"),
    a("grp_radx", XU1, "grp_cnt", "0"),
    a("pgm_char", XCn, "grp_cnt", "length byte = 0"),
    a("rtn_char", XCn, "grp_cnt", "length byte = 0"),
    a("pgm_chal", XCn, "grp_cnt", "length byte = 0"),
    a("rtn_chal", XCn, "grp_cnt", "length byte = 0"),
];

const RDR: &[FieldSpec] = &[
    f("num_bins", U2, ""),
    a("rtst_bin", XU2, "num_bins", "num_bins = 0"),
];

const SDR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_grp", U1, ""),
    f("site_cnt", U1, ""),
    a("site_num", XU1, "site_cnt", ""),
    f("hand_typ", Cn, "length byte = 0"),
    f("hand_id", Cn, "length byte = 0"),
    f("card_typ", Cn, "length byte = 0"),
    f("card_id", Cn, "length byte = 0"),
    f("load_typ", Cn, "length byte = 0"),
    f("load_id", Cn, "length byte = 0"),
    f("dib_typ", Cn, "length byte = 0"),
    f("dib_id", Cn, "length byte = 0"),
    f("cabl_typ", Cn, "length byte = 0"),
    f("cabl_id", Cn, "length byte = 0"),
    f("cont_typ", Cn, "length byte = 0"),
    f("cont_id", Cn, "length byte = 0"),
    f("lasr_typ", Cn, "length byte = 0"),
    f("lasr_id", Cn, "length byte = 0"),
    f("extr_typ", Cn, "length byte = 0"),
    f("extr_id", Cn, "length byte = 0"),
];

const WIR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_grp", U1, "255"),
    f("start_t", U4, ""),
    f("wafer_id", Cn, "length byte = 0"),
];

const WRR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_grp", U1, "255"),
    f("finish_t", U4, ""),
    f("part_cnt", U4, ""),
    f("rtst_cnt", U4, "4294967295"),
    f("abrt_cnt", U4, "4294967295"),
    f("good_cnt", U4, "4294967295"),
    f("func_cnt", U4, "4294967295"),
    f("wafer_id", Cn, "length byte = 0"),
    f("fabwf_id", Cn, "length byte = 0"),
    f("frame_id", Cn, "length byte = 0"),
    f("mask_id", Cn, "length byte = 0"),
    f("usr_desc", Cn, "length byte = 0"),
    f("exc_desc", Cn, "length byte = 0"),
];

const WCR: &[FieldSpec] = &[
    f("wafr_siz", R4, "0"),
    f("die_ht", R4, "0"),
    f("die_wid", R4, "0"),
    f("wf_units", U1, "0"),
    f("wf_flat", C1, "space"),
    f("center_x", I2, "-32768"),
    f("center_y", I2, "-32768"),
    f("pos_x", C1, "space"),
    f("pos_y", C1, "space"),
];

const PIR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_num", U1, ""),
];

const PRR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("part_flg", B1, ""),
    f("num_test", U2, ""),
    f("hard_bin", U2, ""),
    f("soft_bin", U2, "65535"),
    f("x_coord", I2, "-32768"),
    f("y_coord", I2, "-32768"),
    f("test_t", U4, "0"),
    f("part_id", Cn, "length byte = 0"),
    f("part_txt", Cn, "length byte = 0"),
    f("part_fix", Bn, "length byte = 0"),
];

const TSR: &[FieldSpec] = &[
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("test_typ", C1, "space"),
    f("test_num", U4, ""),
    f("exec_cnt", U4, "4294967295"),
    f("fail_cnt", U4, "4294967295"),
    f("alrm_cnt", U4, "4294967295"),
    f("test_nam", Cn, "length byte = 0"),
    f("seq_name", Cn, "length byte = 0"),
    f("test_lbl", Cn, "length byte = 0"),
    f("opt_flag", B1, ""),
    f("test_tim", R4, "opt_flag bit 2 = 1"),
    f("test_min", R4, "opt_flag bit 0 = 1"),
    f("test_max", R4, "opt_flag bit 1 = 1"),
    f("tst_sums", R4, "opt_flag bit 4 = 1"),
    f("tst_sqrs", R4, "opt_flag bit 5 = 1"),
];

const PTR: &[FieldSpec] = &[
    f("test_num", U4, ""),
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("test_flg", B1, ""),
    f("parm_flg", B1, ""),
    f("result", R4, "test_flg bit 1 = 1"),
    f("test_txt", Cn, "length byte = 0"),
    f("alarm_id", Cn, "length byte = 0"),
    f("opt_flag", B1, ""),
    f("res_scal", I1, "opt_flag bit 0 = 1"),
    f("llm_scal", I1, "opt_flag bit 4 or 6 = 1"),
    f("hlm_scal", I1, "opt_flag bit 5 or 7 = 1"),
    f("lo_limit", R4, "opt_flag bit 4 or 6 = 1"),
    f("hi_limit", R4, "opt_flag bit 5 or 7 = 1"),
    f("units", Cn, "length byte = 0"),
    f("c_resfmt", Cn, "length byte = 0"),
    f("c_llmfmt", Cn, "length byte = 0"),
    f("c_hlmfmt", Cn, "length byte = 0"),
    f("lo_spec", R4, "opt_flag bit 2 = 1"),
    f("hi_spec", R4, "opt_flag bit 3 = 1"),
];

const MPR: &[FieldSpec] = &[
    f("test_num", U4, ""),
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("test_flg", B1, ""),
    f("parm_flg", B1, ""),
    f("rtn_icnt", U2, ""),
    f("rslt_cnt", U2, ""),
    a("rtn_stat", XN1, "rtn_icnt", "rtn_icnt = 0"),
    a("rtn_rslt", XR4, "rslt_cnt", "rslt_cnt = 0"),
    f("test_txt", Cn, "length byte = 0"),
    f("alarm_id", Cn, "length byte = 0"),
    f("opt_flag", B1, ""),
    f("res_scal", I1, "opt_flag bit 0 = 1"),
    f("llm_scal", I1, "opt_flag bit 4 or 6 = 1"),
    f("hlm_scal", I1, "opt_flag bit 5 or 7 = 1"),
    f("lo_limit", R4, "opt_flag bit 4 or 6 = 1"),
    f("hi_limit", R4, "opt_flag bit 5 or 7 = 1"),
    f("start_in", R4, "opt_flag bit 1 = 1"),
    f("incr_in", R4, "opt_flag bit 1 = 1"),
    a("rtn_indx", XU2, "rtn_icnt", "rtn_icnt = 0"),
    f("units", Cn, "length byte = 0"),
    f("units_in", Cn, "length byte = 0"),
    f("c_resfmt", Cn, "length byte = 0"),
    f("c_llmfmt", Cn, "length byte = 0"),
    f("c_hlmfmt", Cn, "length byte = 0"),
    f("lo_spec", R4, "opt_flag bit 2 = 1"),
    f("hi_spec", R4, "opt_flag bit 3 = 1"),
];

const FTR: &[FieldSpec] = &[
    f("test_num", U4, ""),
    f("head_num", U1, ""),
    f("site_num", U1, ""),
    f("test_flg", B1, ""),
    f("opt_flag", B1, ""),
    f("cycl_cnt", U4, "opt_flag bit 0 = 1"),
    f("rel_vadr", U4, "opt_flag bit 1 = 1"),
    f("rept_cnt", U4, "opt_flag bit 2 = 1"),
    f("num_fail", U4, "opt_flag bit 3 = 1"),
    f("xfail_ad", I4, "opt_flag bit 4 = 1"),
    f("yfail_ad", I4, "opt_flag bit 4 = 1"),
    f("vect_off", I2, "opt_flag bit 5 = 1"),
    f("rtn_icnt", U2, ""),
    f("pgm_icnt", U2, ""),
    a("rtn_indx", XU2, "rtn_icnt", "rtn_icnt = 0"),
    a("rtn_stat", XN1, "rtn_icnt", "rtn_icnt = 0"),
    a("pgm_indx", XU2, "pgm_icnt", "pgm_icnt = 0"),
    a("pgm_stat", XN1, "pgm_icnt", "pgm_icnt = 0"),
    f("fail_pin", Dn, "length byte = 0"),
    f("vect_nam", Cn, "length byte = 0"),
    f("time_set", Cn, "length byte = 0"),
    f("op_code", Cn, "length byte = 0"),
    f("test_txt", Cn, "length byte = 0"),
    f("alarm_id", Cn, "length byte = 0"),
    f("prog_txt", Cn, "length byte = 0"),
    f("rslt_txt", Cn, "length byte = 0"),
    f("patg_num", U1, "255"),
    f("spin_map", Dn, "length byte = 0"),
];

const BPS: &[FieldSpec] = &[
    f("seq_name", Cn, "length byte = 0"),
];

const EPS: &[FieldSpec] = &[];

const GDR: &[FieldSpec] = &[
    f("fld_cnt", U2, ""),
    a("gen_data", Vn, "fld_cnt", ""),
];

const DTR: &[FieldSpec] = &[
    f("text_dat", Cn, ""),
];

/// Every STDF V4 record kind, in the order records usually appear in a file.
pub(crate) const RECORDS: &[RecordSpec] = &[
    r("FAR", 0, 10, FAR),
    r("ATR", 0, 20, ATR),
    r("MIR", 1, 10, MIR),
    r("MRR", 1, 20, MRR),
    r("PCR", 1, 30, PCR),
    r("HBR", 1, 40, HBR),
    r("SBR", 1, 50, SBR),
    r("PMR", 1, 60, PMR),
    r("PGR", 1, 62, PGR),
    r("PLR", 1, 63, PLR),
    r("RDR", 1, 70, RDR),
    r("SDR", 1, 80, SDR),
    r("WIR", 2, 10, WIR),
    r("WRR", 2, 20, WRR),
    r("WCR", 2, 30, WCR),
    r("PIR", 5, 10, PIR),
    r("PRR", 5, 20, PRR),
    r("TSR", 10, 30, TSR),
    r("PTR", 15, 10, PTR),
    r("MPR", 15, 15, MPR),
    r("FTR", 15, 20, FTR),
    r("BPS", 20, 10, BPS),
    r("EPS", 20, 20, EPS),
    r("GDR", 50, 10, GDR),
    r("DTR", 50, 30, DTR),
];
