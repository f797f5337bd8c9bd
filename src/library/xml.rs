//! Parses a single IP-XACT `busDefinition` or `abstractionDefinition` XML
//! file into the in-memory model. Namespace-agnostic: the `spirit:`/
//! `ipxact:` prefix is ignored and only the local element name is matched,
//! since a 2009 and a 2014 bus/abstraction definition carry the same
//! element names under a different namespace URI.

use roxmltree::{Document, Node};

use crate::model::bus::{Presence, Side, SideDescriptor};
use crate::model::port::{Direction, Expr};
use crate::model::{AbstractionDefinition, BusDefinition, LogicalPort, Vlnv};

#[derive(Debug)]
pub enum ParsedDefinition {
    Bus(BusDefinition),
    Abstraction(AbstractionDefinition),
    /// Recognized as IP-XACT but not one of the two kinds this crate
    /// consumes (e.g. a `component` file sitting in the library tree).
    Other,
}

pub fn parse_file(contents: &str) -> Result<ParsedDefinition, String> {
    let doc = Document::parse(contents).map_err(|e| e.to_string())?;
    let root = doc.root_element();
    match local_name(root) {
        "busDefinition" => Ok(ParsedDefinition::Bus(parse_bus_definition(root)?)),
        "abstractionDefinition" => {
            Ok(ParsedDefinition::Abstraction(parse_abstraction_definition(root)?))
        }
        _ => Ok(ParsedDefinition::Other),
    }
}

fn local_name<'a>(n: Node<'a, 'a>) -> &'a str {
    n.tag_name().name()
}

fn child_elem<'a, 'b>(n: Node<'a, 'b>, local: &str) -> Option<Node<'a, 'b>> {
    n.children().find(|c| c.is_element() && local_name(*c) == local)
}

fn child_text(n: Node, local: &str) -> Option<String> {
    child_elem(n, local).and_then(|c| c.text()).map(|s| s.trim().to_string())
}

fn parse_vlnv(n: Node) -> Result<Vlnv, String> {
    Ok(Vlnv {
        vendor: child_text(n, "vendor").ok_or("missing vendor")?,
        library: child_text(n, "library").ok_or("missing library")?,
        name: child_text(n, "name").ok_or("missing name")?,
        version: child_text(n, "version").ok_or("missing version")?,
    })
}

/// A `busType`/`abstractionType` reference is carried as attributes on its
/// own element rather than child elements.
fn parse_vlnv_attrs(n: Node) -> Option<Vlnv> {
    Some(Vlnv {
        vendor: n.attribute("vendor")?.to_string(),
        library: n.attribute("library")?.to_string(),
        name: n.attribute("name")?.to_string(),
        version: n.attribute("version")?.to_string(),
    })
}

fn parse_bool(s: Option<String>) -> bool {
    matches!(s.as_deref(), Some("true") | Some("1"))
}

fn parse_bus_definition(root: Node) -> Result<BusDefinition, String> {
    let vlnv = parse_vlnv(root)?;
    let direct_connection = parse_bool(child_text(root, "directConnection"));
    let is_addressable = parse_bool(child_text(root, "isAddressable"));
    let declared_parameters = child_elem(root, "parameters")
        .map(|params| {
            params
                .children()
                .filter(|c| c.is_element() && local_name(*c) == "parameter")
                .filter_map(|p| child_text(p, "name"))
                .collect()
        })
        .unwrap_or_default();

    Ok(BusDefinition {
        vlnv,
        is_addressable,
        direct_connection,
        declared_parameters,
    })
}

fn parse_direction(s: Option<String>) -> Option<Direction> {
    match s.as_deref() {
        Some("in") => Some(Direction::In),
        Some("out") => Some(Direction::Out),
        Some("inout") => Some(Direction::InOut),
        _ => None,
    }
}

fn parse_presence(s: Option<String>) -> Presence {
    match s.as_deref() {
        Some("required") => Presence::Required,
        Some("illegal") => Presence::Illegal,
        _ => Presence::Optional,
    }
}

fn parse_side_descriptor(n: Node) -> SideDescriptor {
    SideDescriptor {
        presence: parse_presence(child_text(n, "presence")),
        direction: parse_direction(child_text(n, "direction")).unwrap_or(Direction::InOut),
        width: child_text(n, "width").map(Expr::new),
        default: child_text(n, "defaultValue").map(Expr::new),
    }
}

fn parse_abstraction_definition(root: Node) -> Result<AbstractionDefinition, String> {
    let vlnv = parse_vlnv(root)?;
    let bus_type = child_elem(root, "busType")
        .and_then(parse_vlnv_attrs)
        .ok_or("missing busType reference")?;

    let mut logical_ports = Vec::new();
    if let Some(ports_elem) = child_elem(root, "ports") {
        for port in ports_elem
            .children()
            .filter(|c| c.is_element() && local_name(*c) == "port")
        {
            let name = match child_text(port, "logicalName") {
                Some(n) => n,
                None => continue,
            };
            let wire = match child_elem(port, "wire") {
                Some(w) => w,
                // transactional-only ports carry no wire-level signal info
                // this crate can score against; skip them.
                None => continue,
            };
            let master = child_elem(wire, "onMaster").map(parse_side_descriptor);
            let slave = child_elem(wire, "onSlave").map(parse_side_descriptor);
            let mut logical_port = LogicalPort { name, master, slave };
            logical_port.apply_mirror_inference();
            logical_ports.push(logical_port);
        }
    }

    Ok(AbstractionDefinition {
        vlnv,
        bus_type,
        logical_ports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_bus_definition_with_declared_parameters() {
        let xml = r#"<busDefinition>
            <vendor>amba.com</vendor><library>AMBA4</library><name>AXI4</name><version>r0p0_0</version>
            <directConnection>true</directConnection>
            <isAddressable>true</isAddressable>
            <parameters>
                <parameter><name>DATA_WIDTH</name></parameter>
                <parameter><name>ADDR_WIDTH</name></parameter>
            </parameters>
        </busDefinition>"#;
        let def = match parse_file(xml).unwrap() {
            ParsedDefinition::Bus(b) => b,
            other => panic!("expected a bus definition, got {:?}", other),
        };
        assert_eq!(def.vlnv.name, "AXI4");
        assert!(def.is_addressable);
        assert!(def.direct_connection);
        assert_eq!(def.declared_parameters, vec!["DATA_WIDTH", "ADDR_WIDTH"]);
    }

    #[test]
    fn abstraction_definition_without_an_onslave_block_leaves_mirror_inference_to_the_caller_site() {
        let xml = r#"<abstractionDefinition>
            <vendor>amba.com</vendor><library>AMBA4</library><name>AXI4_rtl</name><version>r0p0_0</version>
            <busType vendor="amba.com" library="AMBA4" name="AXI4" version="r0p0_0"/>
            <ports>
                <port>
                    <logicalName>AWVALID</logicalName>
                    <wire><onMaster><presence>required</presence><direction>out</direction></onMaster></wire>
                </port>
                <port>
                    <logicalName>ACLK</logicalName>
                    <wire></wire>
                </port>
            </ports>
        </abstractionDefinition>"#;
        let def = match parse_file(xml).unwrap() {
            ParsedDefinition::Abstraction(a) => a,
            other => panic!("expected an abstraction definition, got {:?}", other),
        };
        assert_eq!(def.bus_type.name, "AXI4");
        // apply_mirror_inference() already ran inside parse_abstraction_definition.
        let awvalid = def.logical_ports.iter().find(|p| p.name == "AWVALID").unwrap();
        assert_eq!(awvalid.slave.as_ref().unwrap().direction, Direction::In);
        // An empty <wire> still produces a logical port, just with no sides set.
        let aclk = def.logical_ports.iter().find(|p| p.name == "ACLK").unwrap();
        assert!(aclk.master.is_none() && aclk.slave.is_none());
    }

    #[test]
    fn a_port_entry_without_a_wire_block_is_skipped_entirely() {
        let xml = r#"<abstractionDefinition>
            <vendor>v</vendor><library>l</library><name>n</name><version>1.0</version>
            <busType vendor="v" library="l" name="b" version="1.0"/>
            <ports>
                <port><logicalName>TXN_ONLY</logicalName><transactional></transactional></port>
            </ports>
        </abstractionDefinition>"#;
        let def = match parse_file(xml).unwrap() {
            ParsedDefinition::Abstraction(a) => a,
            other => panic!("expected an abstraction definition, got {:?}", other),
        };
        assert!(def.logical_ports.is_empty());
    }

    #[test]
    fn an_unrecognized_root_element_parses_as_other() {
        let xml = r#"<component><vendor>v</vendor></component>"#;
        assert!(matches!(parse_file(xml).unwrap(), ParsedDefinition::Other));
    }
}
