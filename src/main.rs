use std::path::PathBuf;
use std::process::ExitCode;

use blocky_compiler::codegen::{Compiler, CompilerOptions};
use blocky_compiler::{error, parser};
use clap::Parser;
use inkwell::context::Context;

/// Compiles a Blockly XML program to LLVM IR.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Blockly XML document to compile
    #[arg(default_value = "sample.xml")]
    input: PathBuf,

    /// Write the IR here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the generated LLVM module
    #[arg(long, default_value = "blockyllvm")]
    module_name: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let filename = args.input.display().to_string();

    let source = match std::fs::read_to_string(&args.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Cannot read {}: {}", filename, e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("compiling {}", filename);

    let program = match parser::parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            if error::display_parse_error(&source, &filename, &e).is_err() {
                eprintln!("Parsing failed: {}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    let context = Context::create();
    let options = CompilerOptions {
        module_name: args.module_name,
    };
    let compiler = Compiler::with_options(&context, &options);

    let llvm_ir = match compiler.compile_program(&program) {
        Ok(llvm_ir) => llvm_ir,
        Err(e) => {
            if error::display_compile_error(&source, &filename, &e).is_err() {
                eprintln!("Code generation failed: {}", e);
            }
            return ExitCode::FAILURE;
        }
    };

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, llvm_ir) {
                eprintln!("Cannot write {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{}", llvm_ir),
    }
    ExitCode::SUCCESS
}
