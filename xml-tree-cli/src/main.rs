use std::{env, process};

use clap::{value_t, App, AppSettings, Arg, ErrorKind};
use env_logger::Env;
use log::debug;
use xml_tree_rs::{ElementGraph, Figure, RenderOptions, XmlTree, XmlTreeError, XmlTreeResult};

const USAGE: &str = "XML tree viewer
usage: xmltree xmlFile tree-depth(0 for no pruning) [graphic file to save to] [nolabels]";

const NO_LABELS: &str = "nolabels";

#[derive(Debug, PartialEq)]
struct Invocation {
    xml_file: String,
    depth: i64,
    save_path: Option<String>,
    labels: bool,
}

#[derive(Debug, PartialEq)]
enum Request {
    Usage,
    Draw(Invocation),
}

fn app() -> App<'static, 'static> {
    App::new("xmltree")
        .version("0.1")
        .about("Draws the element tree of an XML document as a radial graph")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name("xml_file")
                .value_name("XML_FILE")
                .help("The XML document to draw")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("depth")
                .value_name("TREE_DEPTH")
                .help("Steps from the root to keep, 0 for no pruning")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("output")
                .value_name("OUTPUT_FILE")
                .help("Image file to save to instead of opening a window")
                .index(3),
        )
        .arg(Arg::with_name("flags").multiple(true).hidden(true).index(4))
}

fn parse_args(args: &[String]) -> Result<Request, clap::Error> {
    if args.is_empty() || args.iter().any(|arg| arg.contains("help")) {
        return Ok(Request::Usage);
    }

    let argv = std::iter::once("xmltree").chain(args.iter().map(String::as_str));
    let matches = match app().get_matches_from_safe(argv) {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind, ErrorKind::MissingRequiredArgument | ErrorKind::HelpDisplayed) => {
            return Ok(Request::Usage)
        }
        Err(err) => return Err(err),
    };

    let xml_file = matches.value_of("xml_file").unwrap_or_default().to_string();
    let depth = value_t!(matches, "depth", i64)?;
    // only the third argument can name an output file
    let save_path = matches
        .value_of("output")
        .filter(|&output| output != NO_LABELS)
        .map(str::to_string);
    let labels = !args.iter().any(|arg| arg.contains(NO_LABELS));

    Ok(Request::Draw(Invocation {
        xml_file,
        depth,
        save_path,
        labels,
    }))
}

fn main() -> XmlTreeResult<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(Request::Usage) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Ok(Request::Draw(invocation)) => invocation,
        Err(err) => err.exit(),
    };
    debug!("{:?}", invocation);

    let tree = XmlTree::build(&invocation.xml_file)?;
    let graph = match ElementGraph::construct(&tree, invocation.depth) {
        Err(err @ XmlTreeError::InvalidDepth(_)) => {
            eprintln!("{}", err);
            process::exit(1);
        }
        graph => graph?,
    };

    let options = RenderOptions {
        labels: invocation.labels,
        ..RenderOptions::default()
    };
    let figure = Figure::new(&graph, &options);

    match invocation.save_path {
        Some(save_path) => {
            figure.save(&save_path)?;
            eprintln!("xml tree written to {} ...", save_path);
        }
        None => figure.show()?,
    }

    Ok(())
}
