//! IP-XACT Serializer: from `Module` + matched `BusInterface`s emits a single
//! schema-revision-appropriate XML document. Output is written through a
//! `tempfile`-backed temp-then-rename so a failed write never leaves a
//! half-written document at the destination path, mirroring `orbit`'s own
//! atomic file replacement.

pub mod revision;

use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Error;
use crate::model::{BusInterface, Module, Port, Role};
use revision::Revision;

/// Renders the component document for `module`, its matched `interfaces`,
/// and the leftover `unmapped` ports (though every module port is still
/// emitted under `model/ports` regardless of mapping) under the requested
/// schema `revision`.
///
/// `unmapped` is accepted for API symmetry with the matcher's output; the
/// ports section does not distinguish mapped from unmapped signals.
pub fn serialize(
    module: &Module,
    interfaces: &[BusInterface],
    _unmapped: &[Port],
    revision: Revision,
) -> Result<Vec<u8>, Error> {
    let mut sorted_interfaces: Vec<&BusInterface> = interfaces.iter().collect();
    sorted_interfaces.sort_by(|a, b| a.name.cmp(&b.name));

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let p = revision.prefix();
    let root_tag = format!("{}:component", p);
    let mut root = BytesStart::new(root_tag.as_str());
    root.push_attribute((format!("xmlns:{}", p).as_str(), revision.namespace_uri()));
    root.push_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"));
    root.push_attribute((
        "xsi:schemaLocation",
        format!("{} {}", revision.namespace_uri(), revision.schema_location()).as_str(),
    ));
    writer.write_event(Event::Start(root.clone())).map_err(xml_err)?;

    write_text_elem(&mut writer, p, "vendor", "user")?;
    write_text_elem(&mut writer, p, "library", "user")?;
    write_text_elem(&mut writer, p, "name", &module.name)?;
    write_text_elem(&mut writer, p, "version", "1.0")?;

    write_bus_interfaces(&mut writer, p, &sorted_interfaces)?;

    let address_spaces: Vec<&crate::model::AddressSpace> = sorted_interfaces
        .iter()
        .filter_map(|i| i.address_space.as_ref())
        .collect();
    if !address_spaces.is_empty() {
        open(&mut writer, p, "addressSpaces")?;
        for space in address_spaces {
            open(&mut writer, p, "addressSpace")?;
            write_text_elem(&mut writer, p, "name", &space.name)?;
            write_text_elem(&mut writer, p, "range", &format!("0x{:x}", space.range))?;
            write_text_elem(&mut writer, p, "width", &space.width.to_string())?;
            close(&mut writer, p, "addressSpace")?;
        }
        close(&mut writer, p, "addressSpaces")?;
    }

    let memory_maps: Vec<&crate::model::MemoryMap> = sorted_interfaces
        .iter()
        .filter_map(|i| i.memory_map.as_ref())
        .collect();
    if !memory_maps.is_empty() {
        open(&mut writer, p, "memoryMaps")?;
        for mm in memory_maps {
            open(&mut writer, p, "memoryMap")?;
            write_text_elem(&mut writer, p, "name", &mm.name)?;
            open(&mut writer, p, "addressBlock")?;
            write_text_elem(&mut writer, p, "name", &mm.address_block_name)?;
            write_text_elem(&mut writer, p, "baseAddress", &format!("0x{:x}", mm.base_address))?;
            write_text_elem(&mut writer, p, "range", &format!("0x{:x}", mm.range))?;
            write_text_elem(&mut writer, p, "width", &mm.width.to_string())?;
            write_text_elem(&mut writer, p, "usage", "register")?;
            close(&mut writer, p, "addressBlock")?;
            close(&mut writer, p, "memoryMap")?;
        }
        close(&mut writer, p, "memoryMaps")?;
    }

    write_model(&mut writer, p, module)?;
    write_component_parameters(&mut writer, p, module)?;
    write_file_sets(&mut writer, p, module)?;

    writer.write_event(Event::End(BytesEnd::new(root_tag.as_str()))).map_err(xml_err)?;

    Ok(writer.into_inner())
}

fn write_bus_interfaces(
    writer: &mut Writer<Vec<u8>>,
    p: &str,
    interfaces: &[&BusInterface],
) -> Result<(), Error> {
    if interfaces.is_empty() {
        return Ok(());
    }
    open(writer, p, "busInterfaces")?;
    for iface in interfaces {
        open(writer, p, "busInterface")?;
        write_text_elem(writer, p, "name", &iface.name)?;

        open_with_attrs(writer, p, "busType", &vlnv_attrs(&iface.bus_type))?;
        writer.write_event(Event::End(BytesEnd::new(format!("{}:busType", p)))).map_err(xml_err)?;

        open(writer, p, "abstractionTypes")?;
        open(writer, p, "abstractionType")?;
        open_with_attrs(writer, p, "abstractionRef", &vlnv_attrs(&iface.abstraction_type))?;
        writer
            .write_event(Event::End(BytesEnd::new(format!("{}:abstractionRef", p))))
            .map_err(xml_err)?;
        close(writer, p, "abstractionType")?;
        close(writer, p, "abstractionTypes")?;

        write_role(writer, p, iface)?;

        if !iface.port_maps.is_empty() {
            open(writer, p, "portMaps")?;
            for pm in &iface.port_maps {
                open(writer, p, "portMap")?;
                open(writer, p, "logicalPort")?;
                write_text_elem(writer, p, "name", &pm.logical_name)?;
                close(writer, p, "logicalPort")?;
                open(writer, p, "physicalPort")?;
                write_text_elem(writer, p, "name", &pm.physical_name)?;
                if let Some(slice) = &pm.bit_slice {
                    open(writer, p, "partSelect")?;
                    open(writer, p, "range")?;
                    write_text_elem(writer, p, "left", &slice.left.to_string())?;
                    write_text_elem(writer, p, "right", &slice.right.to_string())?;
                    close(writer, p, "range")?;
                    close(writer, p, "partSelect")?;
                }
                close(writer, p, "physicalPort")?;
                close(writer, p, "portMap")?;
            }
            close(writer, p, "portMaps")?;
        }

        if !iface.parameters.is_empty() {
            open(writer, p, "parameters")?;
            for param in &iface.parameters {
                open(writer, p, "parameter")?;
                write_text_elem(writer, p, "name", &param.name)?;
                write_text_elem(writer, p, "value", param.value.as_str())?;
                close(writer, p, "parameter")?;
            }
            close(writer, p, "parameters")?;
        }

        close(writer, p, "busInterface")?;
    }
    close(writer, p, "busInterfaces")
}

fn write_role(writer: &mut Writer<Vec<u8>>, p: &str, iface: &BusInterface) -> Result<(), Error> {
    let tag = match iface.role {
        Role::Master => "master",
        Role::Slave => "slave",
        Role::System => "system",
        Role::Monitor => "monitor",
    };
    open(writer, p, tag)?;
    match iface.role {
        Role::Master => {
            if let Some(space) = &iface.address_space {
                open_with_attrs(writer, p, "addressSpaceRef", &[("addressSpaceRef", space.name.as_str())])?;
                writer
                    .write_event(Event::End(BytesEnd::new(format!("{}:addressSpaceRef", p))))
                    .map_err(xml_err)?;
            }
        }
        Role::Slave => {
            if let Some(mm) = &iface.memory_map {
                open_with_attrs(writer, p, "memoryMapRef", &[("memoryMapRef", mm.name.as_str())])?;
                writer
                    .write_event(Event::End(BytesEnd::new(format!("{}:memoryMapRef", p))))
                    .map_err(xml_err)?;
            }
        }
        Role::System => {
            write_text_elem(writer, p, "group", "default")?;
        }
        Role::Monitor => {}
    }
    close(writer, p, tag)
}

fn write_model(writer: &mut Writer<Vec<u8>>, p: &str, module: &Module) -> Result<(), Error> {
    open(writer, p, "model")?;
    open(writer, p, "views")?;
    open(writer, p, "view")?;
    write_text_elem(writer, p, "name", "rtl")?;
    write_text_elem(writer, p, "envIdentifier", ":::")?;
    open(writer, p, "fileSetRef")?;
    write_text_elem(writer, p, "localName", "rtl")?;
    close(writer, p, "fileSetRef")?;
    close(writer, p, "view")?;
    close(writer, p, "views")?;
    open(writer, p, "ports")?;
    for port in &module.ports {
        open(writer, p, "port")?;
        write_text_elem(writer, p, "name", &port.name)?;
        open(writer, p, "wire")?;
        write_text_elem(writer, p, "direction", &port.direction.to_string())?;
        if let Some(range) = &port.packed_range {
            open(writer, p, "vector")?;
            write_text_elem(writer, p, "left", range.left.as_str())?;
            write_text_elem(writer, p, "right", range.right.as_str())?;
            close(writer, p, "vector")?;
        }
        close(writer, p, "wire")?;
        close(writer, p, "port")?;
    }
    close(writer, p, "ports")?;
    close(writer, p, "model")
}

fn write_component_parameters(writer: &mut Writer<Vec<u8>>, p: &str, module: &Module) -> Result<(), Error> {
    let externalized: Vec<_> = module.parameters.iter().filter(|param| !param.is_localparam).collect();
    if externalized.is_empty() {
        return Ok(());
    }
    open(writer, p, "parameters")?;
    for param in externalized {
        open(writer, p, "parameter")?;
        write_text_elem(writer, p, "name", &param.name)?;
        if let Some(default) = &param.default {
            write_text_elem(writer, p, "value", default.as_str())?;
        }
        close(writer, p, "parameter")?;
    }
    close(writer, p, "parameters")
}

fn write_file_sets(writer: &mut Writer<Vec<u8>>, p: &str, module: &Module) -> Result<(), Error> {
    open(writer, p, "fileSets")?;
    open(writer, p, "fileSet")?;
    write_text_elem(writer, p, "name", "rtl")?;
    open(writer, p, "file")?;
    write_text_elem(writer, p, "name", &module.source_file.display().to_string())?;
    write_text_elem(writer, p, "fileType", "systemVerilogSource")?;
    close(writer, p, "file")?;
    close(writer, p, "fileSet")?;
    close(writer, p, "fileSets")
}

fn vlnv_attrs(vlnv: &crate::model::Vlnv) -> Vec<(&str, &str)> {
    vec![
        ("vendor", vlnv.vendor.as_str()),
        ("library", vlnv.library.as_str()),
        ("name", vlnv.name.as_str()),
        ("version", vlnv.version.as_str()),
    ]
}

fn open(writer: &mut Writer<Vec<u8>>, p: &str, tag: &str) -> Result<(), Error> {
    writer
        .write_event(Event::Start(BytesStart::new(format!("{}:{}", p, tag))))
        .map_err(xml_err)
}

fn open_with_attrs(writer: &mut Writer<Vec<u8>>, p: &str, tag: &str, attrs: &[(&str, &str)]) -> Result<(), Error> {
    let mut elem = BytesStart::new(format!("{}:{}", p, tag));
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Start(elem)).map_err(xml_err)
}

fn close(writer: &mut Writer<Vec<u8>>, p: &str, tag: &str) -> Result<(), Error> {
    writer
        .write_event(Event::End(BytesEnd::new(format!("{}:{}", p, tag))))
        .map_err(xml_err)
}

fn write_text_elem(writer: &mut Writer<Vec<u8>>, p: &str, tag: &str, text: &str) -> Result<(), Error> {
    open(writer, p, tag)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    close(writer, p, tag)
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Custom(format!("xml writer error: {}", e))
}

/// Writes `bytes` to `path` via a sibling temp file then rename, so a write
/// failure never leaves a half-written document at the destination.
pub fn write_output_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| Error::OutputIoError(path.to_path_buf(), e.into()))?;
    tmp.write_all(bytes)
        .map_err(|e| Error::OutputIoError(path.to_path_buf(), e.into()))?;
    tmp.persist(path)
        .map_err(|e| Error::OutputIoError(path.to_path_buf(), e.error.into()))?;
    Ok(())
}
