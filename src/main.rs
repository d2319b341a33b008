// quadc: three-address code compiler

use std::fs;
use std::path::Path;
use std::process;

use clap::Parser;

use quadc::codegen::listing;
use quadc::config::{Emit, Options};
use quadc::diagnostics;
use quadc::session::Session;

fn main() {
    env_logger::init();

    // clap reports usage errors itself and exits with status 2
    let options = Options::parse();

    let source = match fs::read_to_string(&options.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", options.input.display(), e);
            process::exit(2);
        }
    };
    let source_name = options.input.display().to_string();

    let mut session = Session::new();
    let result = match options.emit {
        Emit::Code => quadc::compile(&source, &mut session).map(|code| listing(&code)),
        Emit::Ast => quadc::parse(&source, &mut session).map(|program| format!("{:#?}", program)),
    };
    let text = match result {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", diagnostics::render(&e, &source_name, options.color()));
            process::exit(1);
        }
    };

    match &options.output {
        Some(path) => write_output(path, &text),
        None => println!("{}", text),
    }
}

fn write_output(path: &Path, text: &str) {
    if let Err(e) = fs::write(path, format!("{}\n", text)) {
        eprintln!("Error: cannot write '{}': {}", path.display(), e);
        process::exit(2);
    }
}
