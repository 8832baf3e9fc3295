//! domshot – command-line widget rasterizer.
//!
//! Usage:
//!   domshot <input.html> [output.png|output.pdf] [--background <color>] [--dump-layout <path>]
//!
//! If the output is omitted a PNG is written next to the input file with
//! the same stem (e.g. `panel.html` → `panel.png`).

use std::{env, fs, path::PathBuf, process};

use domshot::layout::layout_node;
use domshot::style::build_styled_tree;
use domshot::{first_element, parse_html, Rasterizer};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut background: Option<String> = None;
    let mut dump_layout: Option<PathBuf> = None;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1).peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--background" | "-b" => match iter.next() {
                Some(v) => background = Some(v.clone()),
                None => {
                    eprintln!("--background requires a color value");
                    process::exit(1);
                }
            },
            "--dump-layout" => match iter.next() {
                Some(v) => dump_layout = Some(PathBuf::from(v)),
                None => {
                    eprintln!("--dump-layout requires a path");
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    // Default output: same directory + same stem as input, but with .png
    let output = output_path.unwrap_or_else(|| {
        let mut o = input.clone();
        o.set_extension("png");
        o
    });

    let html = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", input.display());
            process::exit(1);
        }
    };

    let nodes = parse_html(&html);
    let element = match first_element(&nodes) {
        Some(e) => e.clone(),
        None => {
            eprintln!("Error: '{}' contains no element to rasterize.", input.display());
            process::exit(1);
        }
    };

    let mut job = match Rasterizer::new(&element, background.as_deref()) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error creating job: {e}");
            process::exit(1);
        }
    };

    if let Some(dump_path) = &dump_layout {
        let styled = build_styled_tree(&[domshot::dom::DomNode::Element(element.clone())]);
        let dump = styled
            .first()
            .and_then(|s| layout_node(s, Some(job.width() as f32)))
            .map(|root| root.dump());
        match dump {
            Some(d) => {
                let json = serde_json::to_string_pretty(&d).unwrap_or_default();
                if let Err(e) = fs::write(dump_path, json) {
                    eprintln!("Error writing '{}': {e}", dump_path.display());
                    process::exit(1);
                }
            }
            None => eprintln!("No layout to dump (element subtree is empty)."),
        }
    }

    let is_pdf = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        // to_pdf appends ".pdf" itself; hand it the stem.
        let stem = output.with_extension("");
        match job.to_pdf(&stem.to_string_lossy()) {
            Ok(Some(path)) => {
                eprintln!("Wrote '{}' ({}x{} px)", path.display(), job.width(), job.height());
            }
            Ok(None) => {
                eprintln!("Element measured 0x0; no PDF written.");
            }
            Err(e) => {
                eprintln!("Error generating PDF: {e}");
                process::exit(1);
            }
        }
    } else {
        let png = match job.to_bitmap().and_then(|s| s.to_png()) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error rasterizing: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = fs::write(&output, &png) {
            eprintln!("Error writing '{}': {e}", output.display());
            process::exit(1);
        }
        eprintln!(
            "Wrote '{}' ({} bytes, {}x{} px)",
            output.display(),
            png.len(),
            job.width(),
            job.height()
        );
    }
}

fn print_usage(prog: &str) {
    eprintln!("domshot – widget rasterizer (HTML element → PNG / single-image PDF)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <input.html> [output.png|output.pdf] [--background <color>] [--dump-layout <path>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <input.html>   File whose first element is rasterized (images must be base64 data URIs)");
    eprintln!("  [output]       Output path; .pdf selects PDF output  (default: input stem + .png)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --background, -b   Background fill color (default: element background, else #ffffff)");
    eprintln!("  --dump-layout      Write the computed layout box tree as JSON to the given path");
    eprintln!("  --help             Print this message");
}
