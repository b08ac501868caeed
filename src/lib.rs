//! Generates mock implementations of Go interfaces for the testify `mock`
//! package.
//!
//! The pipeline is: [`io::walker`] finds source files, [`extraction`] turns
//! each file into [`core::Interface`] records, [`generator`] renders a mock
//! for every selected interface using [`render`] for type expressions, and
//! [`commands::generate`] ties the stages together and writes the results.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod generator;
pub mod io;
pub mod render;

pub use crate::config::{CaseStyle, GeneratorConfig, NameFilter, OutputTarget, RunConfig};
pub use crate::core::{
    ChanDir, Import, Interface, InterfaceElement, Method, Parameter, ReturnValue, StructField,
    TypeExpression,
};
pub use crate::errors::{Error, ExtractError, GenerationError, GenerationFailure, Result, RunReport};
pub use crate::extraction::{extract, extract_file, SourceUnit};
pub use crate::generator::{emit, Generator};
pub use crate::render::render;
