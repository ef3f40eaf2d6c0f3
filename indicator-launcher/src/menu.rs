//! Interactive launch menu.

use console::Term;
use dialoguer::Input;
use std::fmt;
use std::io::{BufRead, IsTerminal, Write};
use std::str::FromStr;

use crate::error::LaunchError;

/// How the site should be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchChoice {
    /// `npx http-server`, falling back to the built-in server
    ExternalRuntime,
    /// Built-in server
    BuiltIn,
    /// Do nothing
    Exit,
}

impl LaunchChoice {
    /// Menu number shown to the user.
    pub const fn number(self) -> u8 {
        match self {
            Self::ExternalRuntime => 1,
            Self::BuiltIn => 2,
            Self::Exit => 3,
        }
    }

    /// Menu label shown to the user.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExternalRuntime => "使用Node.js http-server（推荐）",
            Self::BuiltIn => "使用内置服务器",
            Self::Exit => "退出",
        }
    }

    pub const ALL: [Self; 3] = [Self::ExternalRuntime, Self::BuiltIn, Self::Exit];
}

impl fmt::Display for LaunchChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

impl FromStr for LaunchChoice {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "node" => Ok(Self::ExternalRuntime),
            "2" | "builtin" => Ok(Self::BuiltIn),
            "3" | "exit" => Ok(Self::Exit),
            _ => Err(LaunchError::InvalidChoice(s.trim().to_string())),
        }
    }
}

const PROMPT: &str = "请输入选择 (1-3)";

/// Print the menu and read one line of input.
///
/// The raw text is returned so the caller decides how to report bad input.
/// Piped input (`echo 3 | indicator-launcher`) is read line by line instead
/// of through the interactive prompt.
pub fn prompt_choice() -> Result<String, LaunchError> {
    println!("\n请选择启动方式:");
    for choice in LaunchChoice::ALL {
        println!("{choice}");
    }
    println!();

    if std::io::stdin().is_terminal() && Term::stderr().is_term() {
        let input: String = Input::new()
            .with_prompt(PROMPT)
            .allow_empty(true)
            .interact_text()?;
        return Ok(input);
    }

    print!("{PROMPT}: ");
    let _ = std::io::stdout().flush();
    let input = read_choice_line(&mut std::io::stdin().lock())?;
    println!();
    Ok(input)
}

/// Read one answer from non-interactive input. End of input reads as empty.
pub fn read_choice_line(reader: &mut impl BufRead) -> Result<String, LaunchError> {
    let mut line = String::new();
    reader.read_line(&mut line).map_err(LaunchError::ReadInput)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1", LaunchChoice::ExternalRuntime ; "one")]
    #[test_case(" 2 ", LaunchChoice::BuiltIn ; "two padded")]
    #[test_case("3", LaunchChoice::Exit ; "three")]
    #[test_case("Node", LaunchChoice::ExternalRuntime ; "node alias")]
    #[test_case("builtin", LaunchChoice::BuiltIn ; "builtin alias")]
    fn test_parse_choice(input: &str, expected: LaunchChoice) {
        assert_eq!(input.parse::<LaunchChoice>().unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("4" ; "out of range")]
    #[test_case("1 2" ; "two numbers")]
    fn test_parse_invalid(input: &str) {
        assert!(matches!(
            input.parse::<LaunchChoice>(),
            Err(LaunchError::InvalidChoice(_))
        ));
    }

    #[test_case("3\n", "3" ; "newline terminated")]
    #[test_case(" 2 \r\n", "2" ; "padded crlf")]
    #[test_case("1\n2\n", "1" ; "first line only")]
    #[test_case("", "" ; "end of input")]
    fn test_read_choice_line(input: &str, expected: &str) {
        let mut reader = std::io::Cursor::new(input.as_bytes());
        assert_eq!(read_choice_line(&mut reader).unwrap(), expected);
    }

    #[test]
    fn test_piped_answer_parses() {
        let mut reader = std::io::Cursor::new(b"3\n".as_slice());
        let answer = read_choice_line(&mut reader).unwrap();
        assert_eq!(answer.parse::<LaunchChoice>().unwrap(), LaunchChoice::Exit);
    }

    #[test]
    fn test_menu_lines() {
        let lines: Vec<String> = LaunchChoice::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(lines[0], "1. 使用Node.js http-server（推荐）");
        assert_eq!(lines[2], "3. 退出");
    }
}
