use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger as logger;
use owo_colors::OwoColorize;

use globcheck::{MatchKind, MatchResult, Matcher};

const GLOBCHECK_LOG: &str = "GLOBCHECK_LOG";
const GLOBCHECK_LOG_STYLE: &str = "GLOBCHECK_LOG_STYLE";

/// Match texts against a shell-style glob pattern.
///
/// Supports `?`, `*`, bracket groups like `[a-z]` or `[!0-9]`, POSIX classes
/// like `[[:alpha:]]` and `\` escapes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Glob pattern.
    pattern: String,

    /// Texts to match; read from stdin, one per line, when omitted.
    texts: Vec<String>,

    /// Expected outcome for every text; the run stops at the first mismatch.
    #[arg(short, long, value_name = "KIND")]
    expect: Option<MatchKind>,

    /// Report through the exit status only.
    #[arg(short, long)]
    quiet: bool,

    /// Color the result labels.
    #[arg(
        long,
        value_enum,
        value_name = "WHEN",
        default_value_t = ColorWhen::Auto,
        env = "GLOBCHECK_COLOR"
    )]
    color: ColorWhen,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

// Exit status when no expectation is given: any syntax error wins over a
// plain mismatch.
fn exit_code(kind: MatchKind) -> u8 {
    match kind {
        MatchKind::Matched => 0,
        MatchKind::Unmatched => 1,
        MatchKind::SyntaxError => 2,
    }
}

fn paint(kind: MatchKind, color: bool) -> String {
    let label = kind.label();
    if !color {
        return label.to_owned();
    }
    match kind {
        MatchKind::Matched => label.green().to_string(),
        MatchKind::Unmatched => label.red().to_string(),
        MatchKind::SyntaxError => label.blue().to_string(),
    }
}

fn report(
    out: &mut impl Write,
    pattern: &str,
    text: &[u8],
    result: MatchResult,
    color: bool,
) -> io::Result<()> {
    let text = String::from_utf8_lossy(text);
    write!(out, "{:>12} <=> {:<12} ---> {}", pattern, text, paint(result.kind(), color))?;
    if let MatchResult::SyntaxError(err) = result {
        write!(out, " ({})", err)?;
    }
    writeln!(out)
}

// Reads texts one per line; the line terminator, `\n` or `\r\n`, is stripped.
fn read_texts(input: impl BufRead) -> Result<Vec<Vec<u8>>> {
    input
        .split(b'\n')
        .map(|line| {
            let mut line = line.context("failed to read text from stdin")?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(line)
        })
        .collect()
}

fn bootstrap() {
    if std::env::var(GLOBCHECK_LOG).is_ok() {
        let env = logger::Env::new().filter(GLOBCHECK_LOG).write_style(GLOBCHECK_LOG_STYLE);
        logger::Builder::from_env(env).format_timestamp_micros().init();
        log::debug!("logging initialized");
    } else {
        logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .format_timestamp_millis()
            .init()
    }
}

// Matches every text and reports to `out`; `input` supplies the texts when
// none were given on the command line. Returns the process exit status.
fn run(cli: Cli, input: impl BufRead, out: &mut impl Write) -> Result<u8> {
    let color = cli.color.enabled();
    let matcher = Matcher::new(&cli.pattern);
    log::debug!("expanded pattern: {:?}", String::from_utf8_lossy(matcher.pattern()));

    let texts = if cli.texts.is_empty() {
        read_texts(input)?
    } else {
        cli.texts.into_iter().map(String::into_bytes).collect()
    };

    let mut status = 0;

    for text in &texts {
        let result = matcher.matches(text);
        log::debug!("{:?} -> {:?}", String::from_utf8_lossy(text), result);

        if !cli.quiet {
            report(out, &cli.pattern, text, result, color).context("failed to write result")?;
        }

        match cli.expect {
            Some(expected) if result.kind() != expected => {
                if !cli.quiet {
                    let error = if color { "ERROR".red().to_string() } else { "ERROR".to_owned() };
                    writeln!(out, "{}: FAILURE! Expected {}", error, paint(expected, color))?;
                }
                return Ok(1);
            }
            Some(_) => {}
            None => status = status.max(exit_code(result.kind())),
        }
    }

    Ok(status)
}

// Usage: globcheck [--expect <KIND>] <PATTERN> [TEXT]...
fn main() -> Result<ExitCode> {
    bootstrap();

    let cli = Cli::parse();
    let status = run(cli, io::stdin().lock(), &mut io::stdout().lock())?;

    Ok(ExitCode::from(status))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let args = ["globcheck", "--color", "never"].iter().chain(args);
        Cli::try_parse_from(args).unwrap()
    }

    fn run_with(args: &[&str], input: &str) -> (u8, String) {
        let mut out = Vec::new();
        let status = run(cli(args), input.as_bytes(), &mut out).unwrap();
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let cli = cli(&["--expect", "syntax-error", "[a", "x", "y"]);
        assert_eq!(cli.pattern, "[a");
        assert_eq!(cli.texts, ["x", "y"]);
        assert_eq!(cli.expect, Some(MatchKind::SyntaxError));
        assert_eq!(cli.color, ColorWhen::Never);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_parse_args_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["globcheck", "--expect", "maybe", "*"]).is_err());
    }

    #[test]
    fn test_read_texts() {
        let texts = read_texts(&b"main.c\nindex.js\n\nlast"[..]).unwrap();
        assert_eq!(texts, [&b"main.c"[..], b"index.js", b"", b"last"]);
    }

    #[test]
    fn test_read_texts_crlf() {
        let texts = read_texts(&b"main.c\r\nindex.js\r\n"[..]).unwrap();
        assert_eq!(texts, [&b"main.c"[..], b"index.js"]);
    }

    #[test]
    fn test_report_plain() {
        let mut out = Vec::new();
        report(&mut out, "*.c", b"main.c", MatchResult::Matched, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "         *.c <=> main.c       ---> GLOB_MATCHED\n"
        );
    }

    #[test]
    fn test_report_syntax_error_details() {
        let mut out = Vec::new();
        let result = Matcher::new("[ab").matches("a");
        report(&mut out, "[ab", b"a", result, false).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(
            line.ends_with("---> GLOB_SYNTAX_ERROR (unterminated bracket class at offset 0)\n"),
            "{}",
            line
        );
    }

    #[test]
    fn test_exit_code_ordering() {
        assert!(exit_code(MatchKind::Matched) < exit_code(MatchKind::Unmatched));
        assert!(exit_code(MatchKind::Unmatched) < exit_code(MatchKind::SyntaxError));
    }

    #[rstest]
    #[case(&["*.c", "main.c", "index.c"], 0)]
    #[case(&["*.c", "main.c", "main.js"], 1)]
    #[case(&["[ab", "c", "a"], 2)]
    #[case(&["*.[ch", "x", "main.c"], 2)]
    #[case(&["?", "ab", ""], 1)]
    fn test_run_status(#[case] args: &[&str], #[case] expected: u8) {
        let (status, output) = run_with(args, "");
        assert_eq!(status, expected);
        assert_eq!(output.lines().count(), args.len() - 1);
    }

    #[test]
    fn test_run_syntax_error_wins_over_mismatch() {
        // The syntax error comes after a plain mismatch and still decides the status.
        let (status, _) = run_with(&["a[", "b", "ax"], "");
        assert_eq!(status, 2);
    }

    #[test]
    fn test_run_expect_stops_at_first_mismatch() {
        let (status, output) = run_with(&["--expect", "matched", "*.c", "a.c", "b.js", "c.c"], "");
        assert_eq!(status, 1);

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3, "{}", output);
        assert!(lines[0].ends_with("---> GLOB_MATCHED"));
        assert!(lines[1].contains("b.js") && lines[1].ends_with("---> GLOB_UNMATCHED"));
        assert_eq!(lines[2], "ERROR: FAILURE! Expected GLOB_MATCHED");
        assert!(!output.contains("c.c"));
    }

    #[rstest]
    #[case(&["--expect", "unmatched", "Law*", "GrokLaw", "aw"])]
    #[case(&["--expect", "syntax-error", "\\", "x", "yy"])]
    fn test_run_expect_all_satisfied(#[case] args: &[&str]) {
        let (status, output) = run_with(args, "");
        assert_eq!(status, 0);
        assert!(!output.contains("FAILURE"));
    }

    #[rstest]
    #[case(&["--quiet", "*.c", "main.c", "main.js"], 1)]
    #[case(&["--quiet", "--expect", "matched", "*.c", "main.js"], 1)]
    #[case(&["-q", "[", "x"], 2)]
    fn test_run_quiet(#[case] args: &[&str], #[case] expected: u8) {
        let (status, output) = run_with(args, "");
        assert_eq!(status, expected);
        assert!(output.is_empty(), "{:?}", output);
    }

    #[test]
    fn test_run_reads_input_without_texts() {
        let (status, output) = run_with(&["*.c"], "main.c\r\nindex.c\n");
        assert_eq!(status, 0);
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_run_ignores_input_with_texts() {
        let (status, output) = run_with(&["*.c", "main.c"], "main.js\n");
        assert_eq!(status, 0);
        assert_eq!(output.lines().count(), 1);
    }
}
