//! The Oddo command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library functions.

use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};

use crate::codegen::CodegenConfig;
use crate::compiler::Compiler;
use crate::errors::{print_error, OddoError};

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "oddo",
    version,
    about = "A small reactive language that compiles to JavaScript."
)]
pub struct OddoArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Compile an Oddo source file to JavaScript.
    Compile {
        /// The path to the Oddo source file to compile.
        #[arg(required = true)]
        file: PathBuf,
        /// Write output here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Module specifier for the runtime import.
        #[arg(long, default_value = "oddo")]
        runtime: String,
    },
    /// Parse a source file and report errors without generating code.
    Check {
        /// The path to the Oddo source file to check.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Show the Abstract Syntax Tree (AST) for a source file, as JSON.
    Ast {
        /// The path to the Oddo source file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = OddoArgs::parse();

    match args.command {
        ArgsCommand::Compile {
            file,
            output,
            runtime,
        } => {
            let compiler = Compiler::new(CodegenConfig {
                runtime_library: runtime,
            });
            let js = compiler.compile_file(&file).unwrap_or_else(exit_with_error);
            match output {
                Some(path) => {
                    if let Err(error) = std::fs::write(&path, js) {
                        eprintln!("Cannot write '{}': {}", path.display(), error);
                        process::exit(1);
                    }
                }
                None => print!("{js}"),
            }
        }

        ArgsCommand::Check { file } => {
            let source = read_file_or_exit(&file);
            let name = file.display().to_string();
            let context = crate::errors::SourceContext::from_file(name, source.as_str());
            crate::syntax::parse_program(&source, &context).unwrap_or_else(exit_with_error);
            println!("{}: ok", file.display());
        }

        ArgsCommand::Ast { file } => {
            let source = read_file_or_exit(&file);
            let name = file.display().to_string();
            let context = crate::errors::SourceContext::from_file(name, source.as_str());
            let program =
                crate::syntax::parse_program(&source, &context).unwrap_or_else(exit_with_error);
            match serde_json::to_string_pretty(&program) {
                Ok(json) => println!("{json}"),
                Err(error) => {
                    eprintln!("Cannot serialize AST: {error}");
                    process::exit(1);
                }
            }
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn read_file_or_exit(path: &PathBuf) -> String {
    Compiler::read_file(path).unwrap_or_else(exit_with_error)
}

fn exit_with_error<T>(error: OddoError) -> T {
    print_error(error);
    process::exit(1)
}
