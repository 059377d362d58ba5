//! # weekload-render
//!
//! Rendering backends for weekload report layouts.
//!
//! This crate provides:
//! - Excel workbooks with merged headers, conditional colouring and borders
//!   ([`ExcelRenderer`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use weekload_core::Renderer;
//! use weekload_render::ExcelRenderer;
//! use weekload_report::ReportModel;
//!
//! let layout = ReportModel::new(&roster.departments).generate_data(2025)?;
//!
//! let renderer = ExcelRenderer::new().freeze_cell(4, 4);
//! let xlsx_bytes = renderer.render(&layout)?;
//! std::fs::write("workload.xlsx", xlsx_bytes)?;
//! ```

pub mod excel;

pub use excel::{palette, ExcelRenderer};
