//! Subcommand implementations. Each writes its report to `out`.

use crate::RunnerConfig;
use anyhow::{Context, Result};
use mapalg_ops::{find, operations, propagate_host_crs, OperationError, ParameterMap};
use mapalg_raster::RasterHeader;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// One line per registered operation: id, display name and group.
pub fn list(out: &mut impl Write) -> Result<()> {
    for op in operations() {
        let m = op.metadata();
        writeln!(out, "{:<14} {:<14} {}", m.id, m.display_name, m.group)?;
    }
    Ok(())
}

/// Metadata and parameters of one operation.
pub fn describe(out: &mut impl Write, id: &str) -> Result<()> {
    let op = find(id)?;
    let m = op.metadata();
    writeln!(out, "{} ({})", m.display_name, m.id)?;
    writeln!(out, "Group:         {} ({})", m.group, m.group_id)?;
    writeln!(out, "Grid binding:  {:?}", op.grid_mode())?;
    writeln!(out, "CRS policy:    {:?}", op.crs_policy())?;
    writeln!(out, "Documentation: {}", m.doc_url)?;
    writeln!(out)?;
    writeln!(out, "{}", m.help)?;
    writeln!(out)?;
    writeln!(out, "Parameters:")?;
    for p in op.parameters() {
        writeln!(out, "  {:<8} {:<20} {}", p.key, p.kind.name(), p.label)?;
    }
    Ok(())
}

/// Execute an operation and report its outputs as `KEY=path` lines, or as
/// a JSON object when `json` is set.
pub fn run(
    out: &mut impl Write,
    config: &RunnerConfig,
    id: &str,
    assignments: &[String],
    json: bool,
) -> Result<()> {
    let op = find(id)?;
    let engine = mapalg_engine::load(&config.engine).map_err(OperationError::from)?;
    let params = ParameterMap::from_assignments(assignments)?;

    let outputs = op.execute(engine.as_ref(), &params)?;
    if config.assign_output_crs {
        let assigned = propagate_host_crs(op, &params, &outputs)?;
        if assigned > 0 {
            info!("assigned source CRS to {} output(s)", assigned);
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &outputs)?;
        writeln!(out)?;
    } else {
        for (key, path) in outputs.iter() {
            writeln!(out, "{}={}", key, path.display())?;
        }
    }
    Ok(())
}

/// Header of a raster file.
pub fn info(out: &mut impl Write, path: &Path) -> Result<()> {
    let header = RasterHeader::read(path).with_context(|| format!("Cannot read {}", path.display()))?;

    writeln!(out, "File:         {}", path.display())?;
    writeln!(
        out,
        "Dimensions:   {} rows x {} cols ({} cells)",
        header.rows,
        header.cols,
        header.rows * header.cols
    )?;
    writeln!(out, "Sample type:  {:?}", header.sample)?;
    writeln!(out, "Value scale:  {}", header.value_scale)?;
    match header.nodata {
        Some(nodata) => writeln!(out, "No-data:      {}", nodata)?,
        None => writeln!(out, "No-data:      none")?,
    }
    match header.header_transform {
        Some(t) => writeln!(
            out,
            "Header:       cell size {} at ({}, {})",
            t.pixel_width(),
            t.origin_x(),
            t.origin_y()
        )?,
        None => writeln!(out, "Header:       not georeferenced")?,
    }
    if let Some(gt) = header.geotransform {
        let c = gt.coefficients();
        writeln!(
            out,
            "Geotransform: [{}, {}, {}, {}, {}, {}]",
            c[0], c[1], c[2], c[3], c[4], c[5]
        )?;
    }
    match &header.crs {
        Some(crs) => writeln!(out, "CRS:          {}", crs)?,
        None => writeln!(out, "CRS:          none")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_list() {
        let text = output(|out| list(out));
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("Derivatives of digital elevation models"));
    }

    #[test]
    fn test_describe() {
        let text = output(|out| describe(out, "lookuplinear"));
        assert!(text.contains("INPUT1"));
        assert!(text.contains("lookup-table-file"));
        assert!(text.contains("op_lookuplinear.html"));
    }

    #[test]
    fn test_run_with_unknown_engine() {
        let config = RunnerConfig {
            engine: "pcraster".to_string(),
            ..RunnerConfig::default()
        };
        let mut out = Vec::new();
        let err = run(&mut out, &config, "roundoff", &[], false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OperationError>(),
            Some(OperationError::EngineUnavailable(_))
        ));
        assert!(out.is_empty());
    }
}
