use crate::config::{Config, load_config};
use crate::layout::{GlyphStyle, compute_layout};
use crate::layout_dump::render_json;
use crate::loader::{DocumentFormat, FlowSource, load_document};
use crate::parser::{HeaderDialect, parse_flow};
use crate::render::{render_html, render_markdown, write_output};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "mflow",
    version,
    about = "Render lane-based work flows as tables",
    after_help = "The first line of a flow names the lanes, e.g. `[Browser] submit [Server]`.\n\
                  Every following line is a work step, or `[Lane]label (detail)` to move to another lane.\n\
                  A `#` before a step highlights it; a line `---` ends the flow and starts free text."
)]
pub struct Args {
    /// Input file (.mfw, or .md/.markdown holding `mflow` code blocks). Reads stdin if omitted or '-'
    pub input: Option<PathBuf>,

    /// Output file or directory. Defaults to the input name with the format's extension,
    /// or stdout when reading stdin
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "format", value_enum, default_value = "html")]
    pub format: OutputFormat,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Header syntax; detected from each header line when `auto`
    #[arg(long = "dialect", value_enum, default_value = "auto")]
    pub dialect: DialectArg,

    /// Arrow glyphs
    #[arg(long = "glyphs", value_enum)]
    pub glyphs: Option<GlyphArg>,

    /// Treat an arrow into the current lane as an error
    #[arg(long = "strict")]
    pub strict: bool,

    /// Emit only the HTML table instead of a full page
    #[arg(long = "fragment")]
    pub fragment: bool,

    /// Page title (defaults to the input file name)
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Read stdin as Markdown
    #[arg(long = "markdown")]
    pub markdown: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Markdown,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    Auto,
    Bracket,
    Inverted,
    Comma,
    Pipe,
    Tab,
}

impl DialectArg {
    fn dialect(self) -> Option<HeaderDialect> {
        match self {
            DialectArg::Auto => None,
            DialectArg::Bracket => Some(HeaderDialect::Bracket),
            DialectArg::Inverted => Some(HeaderDialect::InvertedBracket),
            DialectArg::Comma => Some(HeaderDialect::Delimited(',')),
            DialectArg::Pipe => Some(HeaderDialect::Delimited('|')),
            DialectArg::Tab => Some(HeaderDialect::Delimited('\t')),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphArg {
    Unicode,
    Ascii,
}

impl From<GlyphArg> for GlyphStyle {
    fn from(arg: GlyphArg) -> Self {
        match arg {
            GlyphArg::Unicode => GlyphStyle::Unicode,
            GlyphArg::Ascii => GlyphStyle::Ascii,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args);

    let (input, format) = read_input(args.input.as_deref(), args.markdown)?;
    let document = load_document(&input, format, config.dialect)?;
    let stem = args
        .input
        .as_deref()
        .filter(|path| *path != Path::new("-"))
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .map(str::to_string);
    let title = config.render.title.clone().or(stem);

    if document.flows.len() == 1 {
        let rendered = render_flow(&document.flows[0], &config, args.format, title.as_deref())?;
        let output = resolve_output(args.input.as_deref(), args.output.as_deref(), args.format)?;
        return write_output(&rendered, output.as_deref());
    }

    let outputs = resolve_multi_outputs(
        args.input.as_deref(),
        args.output.as_deref(),
        args.format,
        document.flows.len(),
    )?;
    for (idx, (flow, output)) in document.flows.iter().zip(&outputs).enumerate() {
        let flow_title = title.as_deref().map(|title| format!("{} {}", title, idx + 1));
        let rendered = render_flow(flow, &config, args.format, flow_title.as_deref())?;
        write_output(&rendered, Some(output))?;
    }
    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(dialect) = args.dialect.dialect() {
        config.dialect = Some(dialect);
    }
    if let Some(glyphs) = args.glyphs {
        config.layout.glyphs = glyphs.into();
    }
    if args.strict {
        config.layout.strict_self_transitions = true;
    }
    if args.fragment {
        config.render.standalone = false;
    }
    if let Some(title) = &args.title {
        config.render.title = Some(title.clone());
    }
}

fn render_flow(
    flow: &FlowSource,
    config: &Config,
    format: OutputFormat,
    title: Option<&str>,
) -> Result<String> {
    let parsed = parse_flow(flow)?;
    let layout = compute_layout(&parsed, &config.layout)?;
    let trailing = flow.trailing.as_deref();
    let rendered = match format {
        OutputFormat::Html => {
            let mut render_config = config.render.clone();
            render_config.title = title.map(str::to_string);
            render_html(&layout, &config.theme, &render_config, trailing)
        }
        OutputFormat::Markdown => {
            let mut md = render_markdown(&layout);
            if let Some(text) = trailing {
                md.push('\n');
                md.push_str(text);
                md.push('\n');
            }
            md
        }
        OutputFormat::Json => render_json(&layout, title, trailing)?,
    };
    Ok(rendered)
}

fn read_input(path: Option<&Path>, markdown: bool) -> Result<(String, DocumentFormat)> {
    let stdin_format = if markdown {
        DocumentFormat::Markdown
    } else {
        DocumentFormat::Plain
    };
    match path {
        Some(path) if path != Path::new("-") => {
            let format = input_format(path)?;
            let content = std::fs::read_to_string(path)?;
            Ok((content, format))
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, stdin_format))
        }
    }
}

fn input_format(path: &Path) -> Result<DocumentFormat> {
    DocumentFormat::from_path(path).ok_or_else(|| {
        anyhow::anyhow!(
            "unsupported input `{}`: expected one of .{}",
            path.display(),
            DocumentFormat::EXTENSIONS.join(", .")
        )
    })
}

fn resolve_output(
    input: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<Option<PathBuf>> {
    if let Some(path) = output {
        if path == Path::new("-") {
            return Ok(None);
        }
        return Ok(Some(path.to_path_buf()));
    }
    let Some(input) = input.filter(|path| *path != Path::new("-")) else {
        return Ok(None);
    };
    let derived = input.with_extension(format.extension());
    if derived == input {
        return Err(anyhow::anyhow!(
            "Output would overwrite `{}`; pass --output",
            input.display()
        ));
    }
    Ok(Some(derived))
}

fn resolve_multi_outputs(
    input: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    if let Some(base) = output {
        if base.is_dir() {
            return Ok((1..=count)
                .map(|idx| base.join(format!("flow-{idx}.{ext}")))
                .collect());
        }
        return Ok(numbered_siblings(base, ext, count));
    }
    let base = input
        .filter(|path| *path != Path::new("-"))
        .ok_or_else(|| anyhow::anyhow!("Output path required for multiple flows read from stdin"))?;
    Ok(numbered_siblings(base, ext, count))
}

fn numbered_siblings(base: &Path, ext: &str, count: usize) -> Vec<PathBuf> {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("flow");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    (1..=count)
        .map(|idx| parent.join(format!("{stem}-{idx}.{ext}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "mflow", "order.mfw", "-e", "json", "--dialect", "pipe", "--glyphs", "ascii", "--strict",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.input.as_deref(), Some(Path::new("order.mfw")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.verbose, 2);

        let mut config = Config::default();
        apply_args(&mut config, &args);
        assert_eq!(config.dialect, Some(HeaderDialect::Delimited('|')));
        assert_eq!(config.layout.glyphs, GlyphStyle::Ascii);
        assert!(config.layout.strict_self_transitions);
        assert!(config.render.standalone);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["mflow", "-q", "-v"]).is_err());
    }

    #[test]
    fn rejects_unknown_extensions() {
        assert!(input_format(Path::new("flow.txt")).is_err());
        assert_eq!(
            input_format(Path::new("dir/flow.mfw")).unwrap(),
            DocumentFormat::Plain
        );
    }

    #[test]
    fn output_defaults_next_to_input() {
        let out = resolve_output(Some(Path::new("docs/order.mfw")), None, OutputFormat::Html).unwrap();
        assert_eq!(out, Some(PathBuf::from("docs/order.html")));
        let out = resolve_output(None, None, OutputFormat::Html).unwrap();
        assert_eq!(out, None);
        let out = resolve_output(Some(Path::new("a.mfw")), Some(Path::new("-")), OutputFormat::Json)
            .unwrap();
        assert_eq!(out, None);
        assert!(resolve_output(Some(Path::new("notes.md")), None, OutputFormat::Markdown).is_err());
    }

    #[test]
    fn multiple_flows_get_numbered_outputs() {
        let outputs = resolve_multi_outputs(
            Some(Path::new("docs/notes.md")),
            None,
            OutputFormat::Html,
            2,
        )
        .unwrap();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("docs/notes-1.html"),
                PathBuf::from("docs/notes-2.html")
            ]
        );
        let outputs =
            resolve_multi_outputs(None, Some(Path::new("out/all.json")), OutputFormat::Json, 1)
                .unwrap();
        assert_eq!(outputs, vec![PathBuf::from("out/all-1.json")]);
        assert!(resolve_multi_outputs(None, None, OutputFormat::Html, 2).is_err());
    }

    #[test]
    fn renders_flow_in_each_format() {
        let doc = load_document("[A] [B]\na\n[B]go\nb\n---\nnote", DocumentFormat::Plain, None)
            .unwrap();
        let config = Config::default();
        let flow = &doc.flows[0];

        let html = render_flow(flow, &config, OutputFormat::Html, Some("t")).unwrap();
        assert!(html.contains("<title>t</title>"));
        assert!(html.contains("⇒[go]⇒"));
        assert!(html.contains("note"));

        let md = render_flow(flow, &config, OutputFormat::Markdown, None).unwrap();
        assert!(md.starts_with("| A |  | B |\n"));
        assert!(md.ends_with("\nnote\n"));

        let json = render_flow(flow, &config, OutputFormat::Json, None).unwrap();
        assert!(json.contains("\"trailing\": \"note\""));
    }
}
