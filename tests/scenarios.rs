//! Integration tests for the concrete seed conversion scenarios (the
//! revision round-trip lives in `tests/revisions.rs`).

mod common;

use sv2ipxact::grouper::{self, GroupKind};
use sv2ipxact::library;
use sv2ipxact::matcher::{self, MatcherConfig};
use sv2ipxact::model::{Direction, Role};
use sv2ipxact::report::Report;
use sv2ipxact::sv;

fn load(dir: &std::path::Path, file_name: &str, contents: &str) -> sv2ipxact::model::Module {
    let path = common::sv_path(dir, file_name, contents);
    let mut report = Report::new();
    sv::load_module(&path, &mut report).expect("module parses")
}

#[test]
fn axi_master_example_matches_one_interface_with_separate_clock_and_reset() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_axi4_only_library(tmp.path());

    let module = load(tmp.path(), "axi_master_example.sv", common::AXI_MASTER_EXAMPLE);
    assert_eq!(module.ports.len(), 37);

    let grouping = grouper::group_ports(&module);
    let catalog = library::load(tmp.path(), &tmp.path().join("cache.bin"), false, &mut Report::new()).unwrap();

    let mut report = Report::new();
    let outcome = matcher::match_groups(&grouping.groups, &catalog, &module, &MatcherConfig::default(), &mut report);

    let axi = outcome
        .interfaces
        .iter()
        .find(|i| i.name == "M_AXI")
        .expect("M_AXI bus interface matched");
    assert_eq!(axi.role, Role::Master);
    assert_eq!(axi.port_maps.len(), 33);

    assert!(outcome.interfaces.iter().any(|i| i.name == "clk"));
    assert!(outcome.interfaces.iter().any(|i| i.name == "rst_n"));

    let unmapped_names: Vec<&str> = outcome.unmapped.iter().map(|p| p.name.as_str()).collect();
    assert!(unmapped_names.contains(&"start"));
    assert!(unmapped_names.contains(&"done"));
    assert_eq!(unmapped_names.len(), 2);
}

#[test]
fn dual_interface_matches_slave_and_master_with_addressable_attachments() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_dual_interface_library(tmp.path());

    let module = load(tmp.path(), "dual_interface.sv", common::DUAL_INTERFACE);
    let grouping = grouper::group_ports(&module);
    let catalog = library::load(tmp.path(), &tmp.path().join("cache.bin"), false, &mut Report::new()).unwrap();

    let mut report = Report::new();
    let outcome = matcher::match_groups(&grouping.groups, &catalog, &module, &MatcherConfig::default(), &mut report);

    let s_axi = outcome.interfaces.iter().find(|i| i.name == "S_AXI").expect("S_AXI matched");
    assert_eq!(s_axi.role, Role::Slave);
    assert_eq!(s_axi.port_maps.len(), 19);
    let mm = s_axi.memory_map.as_ref().expect("slave of addressable bus carries a memoryMap");
    assert_eq!(mm.name, "MM_S_AXI");

    let m_apb = outcome.interfaces.iter().find(|i| i.name == "M_APB").expect("M_APB matched");
    assert_eq!(m_apb.role, Role::Master);
    assert_eq!(m_apb.port_maps.len(), 8);
    let addr_space = m_apb.address_space.as_ref().expect("master of addressable bus carries an addressSpace");
    assert_eq!(addr_space.name, "AS_M_APB");

    assert!(outcome.unmapped.is_empty());
}

#[test]
fn postfix_only_signals_strip_trailing_direction_marker_before_aligning() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_axi4_only_library(tmp.path());

    let src = r#"
module test_postfix_only (
    output wire [31:0] M_AXI_AWADDR_o,
    output wire [7:0]  M_AXI_AWLEN_o,
    output wire [2:0]  M_AXI_AWSIZE_o,
    output wire [1:0]  M_AXI_AWBURST_o,
    output wire [2:0]  M_AXI_AWPROT_o,
    output wire        M_AXI_AWVALID_o,
    input  wire        M_AXI_AWREADY_i,
    output wire [31:0] M_AXI_WDATA_o,
    output wire [3:0]  M_AXI_WSTRB_o,
    output wire        M_AXI_WVALID_o,
    input  wire        M_AXI_WREADY_i,
    input  wire [1:0]  M_AXI_BRESP_i,
    input  wire        M_AXI_BVALID_i,
    output wire        M_AXI_BREADY_o,
    output wire [31:0] M_AXI_ARADDR_o,
    output wire [7:0]  M_AXI_ARLEN_o,
    output wire [2:0]  M_AXI_ARSIZE_o,
    output wire [1:0]  M_AXI_ARBURST_o,
    output wire [2:0]  M_AXI_ARPROT_o,
    output wire        M_AXI_ARVALID_o,
    input  wire        M_AXI_ARREADY_i,
    input  wire [31:0] M_AXI_RDATA_i,
    input  wire [1:0]  M_AXI_RRESP_i,
    input  wire        M_AXI_RVALID_i,
    output wire        M_AXI_RREADY_o
);
endmodule
"#;
    let module = load(tmp.path(), "test_postfix_only.sv", src);
    assert_eq!(module.ports.len(), 25);

    let grouping = grouper::group_ports(&module);
    let catalog = library::load(tmp.path(), &tmp.path().join("cache.bin"), false, &mut Report::new()).unwrap();
    let mut report = Report::new();
    let outcome = matcher::match_groups(&grouping.groups, &catalog, &module, &MatcherConfig::default(), &mut report);

    assert_eq!(outcome.interfaces.len(), 1);
    let iface = &outcome.interfaces[0];
    assert_eq!(iface.role, Role::Master);
    assert_eq!(iface.port_maps.len(), 25);
    assert!(iface.port_maps.iter().any(|pm| pm.logical_name == "AWADDR" && pm.physical_name == "M_AXI_AWADDR_o"));
    assert!(outcome.unmapped.is_empty());
}

#[test]
fn ambiguous_candidates_still_pick_a_winner_and_report_the_runner_up() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_ambiguity_library(tmp.path());

    let module = load(tmp.path(), "ambiguity_test.sv", common::AMBIGUITY_TEST);
    let grouping = grouper::group_ports(&module);
    assert_eq!(grouping.groups.len(), 1);
    assert_eq!(grouping.groups[0].kind, GroupKind::Bus);

    let catalog = library::load(tmp.path(), &tmp.path().join("cache.bin"), false, &mut Report::new()).unwrap();
    let mut report = Report::new();
    let outcome = matcher::match_groups(&grouping.groups, &catalog, &module, &MatcherConfig::default(), &mut report);

    assert_eq!(outcome.interfaces.len(), 1, "exactly one BusInterface is chosen despite the tie");
    assert!(outcome.unmapped.is_empty());

    let ambiguous = report
        .entries()
        .iter()
        .any(|d| matches!(d, sv2ipxact::report::Diagnostic::AmbiguousMatch { .. }));
    assert!(ambiguous, "the near-tied runner-up must be recorded in the run report");
}

#[test]
fn robust_test_drops_undefined_ifdef_branch_and_recovers_from_a_deceptive_comment() {
    let tmp = tempfile::tempdir().unwrap();
    let path = common::sv_path(tmp.path(), "robust_test.sv", common::ROBUST_TEST);
    let mut report = Report::new();
    let module = sv::load_module(&path, &mut report).expect("parses despite macros/comments/conditionals");

    assert_eq!(module.parameters.len(), 2);
    assert_eq!(module.parameters[0].name, "WIDTH");
    assert_eq!(module.parameters[1].name, "AW");

    let names: Vec<&str> = module.ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["clk", "rst_n", "data_in", "valid"]);
    assert!(!names.contains(&"data_out"));

    let data_in = module.ports.iter().find(|p| p.name == "data_in").unwrap();
    assert_eq!(data_in.direction, Direction::In);
    let range = data_in.packed_range.as_ref().expect("data_in has a packed range");
    assert_eq!(range.left.as_str(), "WIDTH-1");
    assert_eq!(range.right.as_str(), "0");
}
