//! Argument classification, grounded on the original archiver's
//! `commands.c` state machine (`determineFlag`/`isFlag`/`isLongFlag`/
//! `endsWithTar`/`getFlags`/`getFiles`), reworked as a single left-to-right
//! scan so "the last flag that selects an operation wins" is a plain,
//! total order instead of two separate long/short passes.

use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Help,
    Create,
    Extract,
    List,
    Delete,
    Update,
    Append,
    Pack,
    Unknown,
}

#[derive(Debug)]
pub struct ParsedArgs {
    pub operation: Operation,
    pub verbose: bool,
    pub archive: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

/// A flag token classified by [`determine_flag`]; operation-selecting
/// flags return `Some`, `--verbose`/`--file` are handled inline by the
/// caller since they don't pick an operation themselves.
enum Classified {
    Operation(Operation),
    Verbose,
    UseFile,
    Unknown,
}

fn determine_flag(flag: &str) -> Classified {
    let first_char = flag.chars().next().unwrap_or('\0');

    if flag == "--create" || first_char == 'c' {
        return Classified::Operation(Operation::Create);
    }
    if flag == "--extract" || first_char == 'x' {
        return Classified::Operation(Operation::Extract);
    }
    if flag == "--list" || first_char == 't' {
        return Classified::Operation(Operation::List);
    }
    if flag == "--delete" {
        return Classified::Operation(Operation::Delete);
    }
    if flag == "--update" || first_char == 'u' {
        return Classified::Operation(Operation::Update);
    }
    if flag == "--verbose" || first_char == 'v' {
        return Classified::Verbose;
    }
    if flag == "--file" || first_char == 'f' {
        return Classified::UseFile;
    }
    if flag == "--append" || first_char == 'r' {
        return Classified::Operation(Operation::Append);
    }
    if flag == "--help" || first_char == 'h' {
        return Classified::Operation(Operation::Help);
    }
    if flag == "--pack" || first_char == 'p' {
        return Classified::Operation(Operation::Pack);
    }

    Classified::Unknown
}

fn is_short_flag(arg: &str) -> bool {
    let mut chars = arg.chars();
    matches!(chars.next(), Some('-')) && !matches!(chars.next(), Some('-'))
}

fn is_long_flag(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with("--")
}

fn ends_with_tar(arg: &str) -> bool {
    arg.ends_with(".tar")
}

/// Classifies `args` (the process arguments, excluding argv[0]) into an
/// operation, the verbose flag, the archive path, and the remaining
/// non-flag file arguments. Returns `Err` for an unrecognized flag.
pub fn parse(args: &[String]) -> Result<ParsedArgs, String> {
    if args.is_empty() {
        return Ok(ParsedArgs { operation: Operation::Help, verbose: false, archive: None, files: Vec::new() });
    }

    let archive = args.iter().find(|arg| ends_with_tar(arg)).map(PathBuf::from);

    let mut operation = Operation::Unknown;
    let mut verbose = false;

    for arg in args {
        let tokens: Vec<String> = if is_long_flag(arg) {
            vec![arg.clone()]
        } else if is_short_flag(arg) {
            arg.chars().skip(1).map(|c| c.to_string()).collect()
        } else {
            continue;
        };

        for token in tokens {
            match determine_flag(&token) {
                Classified::Operation(op) => operation = op,
                Classified::Verbose => verbose = true,
                Classified::UseFile => {
                    if archive.is_none() {
                        return Err("No .tar file specified in arguments".to_string());
                    }
                }
                Classified::Unknown => return Err(format!("unknown flag {arg}")),
            }
        }
    }

    let files = args
        .iter()
        .filter(|arg| !is_long_flag(arg) && !is_short_flag(arg))
        .filter(|arg| Some(PathBuf::from((*arg).clone())) != archive)
        .map(PathBuf::from)
        .collect();

    Ok(ParsedArgs { operation, verbose, archive, files })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn combined_short_flags_select_create_and_verbose() {
        let parsed = parse(&args(&["-cvf", "out.tar", "a.txt", "b.txt"])).unwrap();
        assert_eq!(parsed.operation, Operation::Create);
        assert!(parsed.verbose);
        assert_eq!(parsed.archive, Some(PathBuf::from("out.tar")));
        assert_eq!(parsed.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn long_flags_are_recognized() {
        let parsed = parse(&args(&["--extract", "--file", "out.tar"])).unwrap();
        assert_eq!(parsed.operation, Operation::Extract);
        assert_eq!(parsed.archive, Some(PathBuf::from("out.tar")));
    }

    #[test]
    fn delete_has_no_short_flag() {
        let parsed = parse(&args(&["--delete", "-vf", "out.tar", "a.txt"])).unwrap();
        assert_eq!(parsed.operation, Operation::Delete);
    }

    #[test]
    fn last_operation_flag_wins() {
        let parsed = parse(&args(&["-c", "-x", "-f", "out.tar"])).unwrap();
        assert_eq!(parsed.operation, Operation::Extract);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse(&args(&["-z", "out.tar"])).is_err());
    }

    #[test]
    fn no_args_means_help() {
        let parsed = parse(&args(&[])).unwrap();
        assert_eq!(parsed.operation, Operation::Help);
    }
}
