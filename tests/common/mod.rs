//! Shared fixtures for the integration tests: a small on-disk IP-XACT
//! library (AXI4, AXI4-Lite, APB, clock, reset, and two near-identical
//! custom protocols for the ambiguity scenario) plus the SystemVerilog
//! sources for the seed conversion scenarios below.

use std::fs;
use std::path::{Path, PathBuf};

/// `(logical name, direction as seen from the master, presence)`.
pub struct LogicalPortSpec {
    pub name: &'static str,
    pub master_direction: &'static str,
    pub presence: &'static str,
}

pub fn port(name: &'static str, master_direction: &'static str) -> LogicalPortSpec {
    LogicalPortSpec {
        name,
        master_direction,
        presence: "required",
    }
}

fn bus_definition_xml(
    vendor: &str,
    library: &str,
    name: &str,
    version: &str,
    is_addressable: bool,
    declared_parameters: &[&str],
) -> String {
    let params = if declared_parameters.is_empty() {
        String::new()
    } else {
        let entries: String = declared_parameters
            .iter()
            .map(|p| format!("<parameter><name>{}</name></parameter>", p))
            .collect();
        format!("<parameters>{}</parameters>", entries)
    };
    format!(
        "<busDefinition>\
           <vendor>{vendor}</vendor><library>{library}</library><name>{name}</name><version>{version}</version>\
           <directConnection>true</directConnection>\
           <isAddressable>{addr}</isAddressable>\
           {params}\
         </busDefinition>",
        vendor = vendor,
        library = library,
        name = name,
        version = version,
        addr = is_addressable,
        params = params,
    )
}

fn abstraction_definition_xml(
    vlnv: (&str, &str, &str, &str),
    bus_vlnv: (&str, &str, &str, &str),
    ports: &[LogicalPortSpec],
) -> String {
    let port_entries: String = ports
        .iter()
        .map(|p| {
            format!(
                "<port><logicalName>{name}</logicalName><wire><onMaster><presence>{presence}</presence><direction>{dir}</direction></onMaster></wire></port>",
                name = p.name,
                presence = p.presence,
                dir = p.master_direction,
            )
        })
        .collect();
    format!(
        "<abstractionDefinition>\
           <vendor>{v}</vendor><library>{l}</library><name>{n}</name><version>{ver}</version>\
           <busType vendor=\"{bv}\" library=\"{bl}\" name=\"{bn}\" version=\"{bver}\"/>\
           <ports>{ports}</ports>\
         </abstractionDefinition>",
        v = vlnv.0,
        l = vlnv.1,
        n = vlnv.2,
        ver = vlnv.3,
        bv = bus_vlnv.0,
        bl = bus_vlnv.1,
        bn = bus_vlnv.2,
        bver = bus_vlnv.3,
        ports = port_entries,
    )
}

fn write_definition(root: &Path, vendor: &str, library: &str, name: &str, version: &str, file_suffix: &str, contents: &str) {
    let dir = root.join(vendor).join(library).join(name).join(version);
    fs::create_dir_all(&dir).expect("create library dir");
    fs::write(dir.join(format!("{}{}.xml", name, file_suffix)), contents).expect("write definition");
}

/// The AMBA4 AXI4 abstraction: a commonly-cited 33-signal "minimal" full AXI4
/// interface (five channels, including ID but without QOS/REGION/USER).
pub fn axi4_ports() -> Vec<LogicalPortSpec> {
    vec![
        port("AWID", "out"),
        port("AWADDR", "out"),
        port("AWLEN", "out"),
        port("AWSIZE", "out"),
        port("AWBURST", "out"),
        port("AWLOCK", "out"),
        port("AWCACHE", "out"),
        port("AWPROT", "out"),
        port("AWVALID", "out"),
        port("AWREADY", "in"),
        port("WDATA", "out"),
        port("WSTRB", "out"),
        port("WLAST", "out"),
        port("WVALID", "out"),
        port("WREADY", "in"),
        port("BRESP", "in"),
        port("BVALID", "in"),
        port("BREADY", "out"),
        port("ARID", "out"),
        port("ARADDR", "out"),
        port("ARLEN", "out"),
        port("ARSIZE", "out"),
        port("ARBURST", "out"),
        port("ARLOCK", "out"),
        port("ARCACHE", "out"),
        port("ARPROT", "out"),
        port("ARVALID", "out"),
        port("ARREADY", "in"),
        port("RDATA", "in"),
        port("RRESP", "in"),
        port("RLAST", "in"),
        port("RVALID", "in"),
        port("RREADY", "out"),
    ]
}

/// AXI4-Lite: AXI4 without burst/len/size/lock/cache/id/last (19 signals).
pub fn axi4_lite_ports() -> Vec<LogicalPortSpec> {
    vec![
        port("AWADDR", "out"),
        port("AWPROT", "out"),
        port("AWVALID", "out"),
        port("AWREADY", "in"),
        port("WDATA", "out"),
        port("WSTRB", "out"),
        port("WVALID", "out"),
        port("WREADY", "in"),
        port("BRESP", "in"),
        port("BVALID", "in"),
        port("BREADY", "out"),
        port("ARADDR", "out"),
        port("ARPROT", "out"),
        port("ARVALID", "out"),
        port("ARREADY", "in"),
        port("RDATA", "in"),
        port("RRESP", "in"),
        port("RVALID", "in"),
        port("RREADY", "out"),
    ]
}

/// APB3 (8 signals).
pub fn apb_ports() -> Vec<LogicalPortSpec> {
    vec![
        port("PADDR", "out"),
        port("PSEL", "out"),
        port("PENABLE", "out"),
        port("PWRITE", "out"),
        port("PWDATA", "out"),
        port("PREADY", "in"),
        port("PRDATA", "in"),
        port("PSLVERR", "in"),
    ]
}

/// Clock and reset are present in every fixture library: the matcher always
/// needs somewhere to route `clk`/`rst_n` groups regardless of which
/// addressable-bus fixtures a given scenario cares about.
pub fn write_clock_and_reset(root: &Path) {
    write_bus(root, "generic.org", "clocks", "clock", "1.0", false, &[], &[port("CLK", "out")]);
    write_bus(root, "generic.org", "resets", "reset", "1.0", false, &[], &[port("RST", "out")]);
}

pub fn write_axi4(root: &Path) {
    write_bus(
        root,
        "amba.com",
        "AMBA4",
        "AXI4",
        "r0p0_0",
        true,
        &["DATA_WIDTH", "ADDR_WIDTH", "ID_WIDTH"],
        &axi4_ports(),
    );
}

pub fn write_axi4_lite(root: &Path) {
    write_bus(
        root,
        "amba.com",
        "AMBA4",
        "AXI4Lite",
        "r0p0_0",
        true,
        &["DATA_WIDTH", "ADDR_WIDTH"],
        &axi4_lite_ports(),
    );
}

pub fn write_apb(root: &Path) {
    write_bus(
        root,
        "amba.com",
        "AMBA3",
        "APB",
        "r0p0_0",
        true,
        &["DATA_WIDTH", "ADDR_WIDTH"],
        &apb_ports(),
    );
}

/// Two bus definitions with byte-for-byte identical logical port sets:
/// whichever scores first wins, but the runner-up should land within the
/// default ambiguity margin and be reported.
pub fn write_ambiguous_pair(root: &Path) {
    let ports = vec![port("DATA", "out"), port("VALID", "out"), port("READY", "in")];
    write_bus(root, "custom.org", "protoA", "PROTO_A", "1.0", false, &[], &ports);
    write_bus(root, "custom.org", "protoB", "PROTO_B", "1.0", false, &[], &ports);
}

/// A library scoped to exactly the fixtures a scenario needs: a group that
/// fully satisfies one addressable bus's required signals will also satisfy
/// any strict-subset profile (e.g. AXI4-Lite's signals are a literal subset
/// of AXI4's), tying their scores. Each scenario below only loads the
/// fixtures its own assertions depend on instead of one shared catalog,
/// keeping each scenario an independent input rather than a fixed point
/// against one fleet-wide library.
pub fn write_axi4_only_library(root: &Path) {
    write_clock_and_reset(root);
    write_axi4(root);
}

pub fn write_dual_interface_library(root: &Path) {
    write_clock_and_reset(root);
    write_axi4_lite(root);
    write_apb(root);
}

pub fn write_ambiguity_library(root: &Path) {
    write_ambiguous_pair(root);
}

fn write_bus(
    root: &Path,
    vendor: &str,
    library: &str,
    name: &str,
    version: &str,
    is_addressable: bool,
    declared_parameters: &[&str],
    ports: &[LogicalPortSpec],
) {
    let bus_xml = bus_definition_xml(vendor, library, name, version, is_addressable, declared_parameters);
    write_definition(root, vendor, library, name, version, "", &bus_xml);

    let abs_xml = abstraction_definition_xml(
        (vendor, library, name, version),
        (vendor, library, name, version),
        ports,
    );
    write_definition(root, vendor, library, name, version, "_rtl", &abs_xml);
}

pub fn sv_path(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).expect("write sv fixture");
    path
}

pub const AXI_MASTER_EXAMPLE: &str = r#"
module axi_master_example (
    input  wire        clk,
    input  wire        rst_n,

    output wire [3:0]  M_AXI_AWID,
    output wire [31:0] M_AXI_AWADDR,
    output wire [7:0]  M_AXI_AWLEN,
    output wire [2:0]  M_AXI_AWSIZE,
    output wire [1:0]  M_AXI_AWBURST,
    output wire        M_AXI_AWLOCK,
    output wire [3:0]  M_AXI_AWCACHE,
    output wire [2:0]  M_AXI_AWPROT,
    output wire        M_AXI_AWVALID,
    input  wire        M_AXI_AWREADY,

    output wire [31:0] M_AXI_WDATA,
    output wire [3:0]  M_AXI_WSTRB,
    output wire        M_AXI_WLAST,
    output wire        M_AXI_WVALID,
    input  wire        M_AXI_WREADY,

    input  wire [1:0]  M_AXI_BRESP,
    input  wire        M_AXI_BVALID,
    output wire        M_AXI_BREADY,

    output wire [3:0]  M_AXI_ARID,
    output wire [31:0] M_AXI_ARADDR,
    output wire [7:0]  M_AXI_ARLEN,
    output wire [2:0]  M_AXI_ARSIZE,
    output wire [1:0]  M_AXI_ARBURST,
    output wire        M_AXI_ARLOCK,
    output wire [3:0]  M_AXI_ARCACHE,
    output wire [2:0]  M_AXI_ARPROT,
    output wire        M_AXI_ARVALID,
    input  wire        M_AXI_ARREADY,

    input  wire [31:0] M_AXI_RDATA,
    input  wire [1:0]  M_AXI_RRESP,
    input  wire        M_AXI_RLAST,
    input  wire        M_AXI_RVALID,
    output wire        M_AXI_RREADY,

    input  wire        start,
    output wire        done
);
endmodule
"#;

pub const DUAL_INTERFACE: &str = r#"
module dual_interface (
    input  wire        clk,
    input  wire        rst_n,

    input  wire [31:0] S_AXI_AWADDR,
    input  wire [2:0]  S_AXI_AWPROT,
    input  wire        S_AXI_AWVALID,
    output wire        S_AXI_AWREADY,
    input  wire [31:0] S_AXI_WDATA,
    input  wire [3:0]  S_AXI_WSTRB,
    input  wire        S_AXI_WVALID,
    output wire        S_AXI_WREADY,
    output wire [1:0]  S_AXI_BRESP,
    output wire        S_AXI_BVALID,
    input  wire        S_AXI_BREADY,
    input  wire [31:0] S_AXI_ARADDR,
    input  wire [2:0]  S_AXI_ARPROT,
    input  wire        S_AXI_ARVALID,
    output wire        S_AXI_ARREADY,
    output wire [31:0] S_AXI_RDATA,
    output wire [1:0]  S_AXI_RRESP,
    output wire        S_AXI_RVALID,
    input  wire        S_AXI_RREADY,

    output wire [31:0] M_APB_PADDR,
    output wire        M_APB_PSEL,
    output wire        M_APB_PENABLE,
    output wire        M_APB_PWRITE,
    output wire [31:0] M_APB_PWDATA,
    input  wire        M_APB_PREADY,
    input  wire [31:0] M_APB_PRDATA,
    input  wire        M_APB_PSLVERR
);
endmodule
"#;

pub const AMBIGUITY_TEST: &str = r#"
module ambiguity_test (
    output wire [31:0] amb_data,
    output wire        amb_valid,
    input  wire        amb_ready
);
endmodule
"#;

pub const ROBUST_TEST: &str = r#"
`define WIDTH 8
module robust_test #(
    parameter WIDTH = 8,
    parameter AW = 4
) (
    input wire clk,
    input wire rst_n,
    /* this comment deliberately contains
       the literal text input wire so the
       preprocessor must not create a port */
    input wire [WIDTH-1:0] data_in,
    output wire valid
`ifdef USE_OUTPUT
    ,output wire [WIDTH-1:0] data_out
`endif
);
endmodule
"#;
