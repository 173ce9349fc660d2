//! The human-editable encoding of the database.
//!
//! The database is stored in protobuf text format, following the schema
//!
//! ```text
//! ExtensionDatabase { repeated ExtensionVersion versions = 1; }
//! ExtensionVersion  { int32 version = 1; repeated ModuleRequirement requirements = 2; }
//! ModuleRequirement { SdkModule module = 1; SdkVersion version = 2; }
//! SdkVersion        { int32 version = 1; }
//! ```
//!
//! Modules are written by their symbolic name. The reader accepts the subset
//! of the text format this schema can produce: `#` comments, `{}` or `<>`
//! message delimiters with an optional `:` before them, `[...]` lists for
//! repeated fields, optional `,` or `;` after a field, decimal, octal
//! (leading `0`) or hexadecimal (`0x`) integers, and enum values given either
//! by name or by code. A scalar field that is absent takes its zero value.

use std::fmt;

use crate::domain::{
    Database, ExtensionVersion, InvalidLevelError, Requirement, SdkLevel, SdkModule,
};

/// Encodes the whole database in text format.
///
/// Every field is written, including zero values, one field per line with
/// two-space indentation.
///
/// # Examples
///
/// ```
/// use gen_sdk::{storage::text, Database, ExtensionVersion, Requirement, SdkLevel, SdkModule};
///
/// let level = SdkLevel::new(1).unwrap();
/// let db = Database::new(vec![ExtensionVersion::new(
///     level,
///     vec![Requirement::new(SdkModule::Ipsec, level)],
/// )]);
///
/// assert_eq!(
///     text::encode(&db),
///     "versions {\n  version: 1\n  requirements {\n    module: IPSEC\n    version {\n      version: 1\n    }\n  }\n}\n",
/// );
/// ```
#[must_use]
pub fn encode(database: &Database) -> String {
    TextDatabase(database).to_string()
}

/// Decodes a database from text format.
///
/// # Errors
///
/// Returns a [`ParseError`] locating the first problem in the input.
pub fn decode(input: &str) -> Result<Database, ParseError> {
    let mut parser = Parser::new(input)?;
    let mut versions = Vec::new();

    parser.fields(None, |parser, field| match field.name.as_str() {
        "versions" => parser.repeated(|parser| {
            versions.push(parser.extension_version()?);
            Ok(())
        }),
        _ => Err(field.unknown("ExtensionDatabase")),
    })?;

    Ok(Database::new(versions))
}

struct TextDatabase<'a>(&'a Database);

impl fmt::Display for TextDatabase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for version in self.0.versions() {
            writeln!(f, "versions {{")?;
            writeln!(f, "  version: {}", version.version)?;
            for requirement in &version.requirements {
                writeln!(f, "  requirements {{")?;
                writeln!(f, "    module: {}", requirement.module)?;
                writeln!(f, "    version {{")?;
                writeln!(f, "      version: {}", requirement.version)?;
                writeln!(f, "    }}")?;
                writeln!(f, "  }}")?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// An error locating a problem in text-format input.
///
/// Lines and columns are 1-based; columns count characters.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("line {line}, column {column}: {kind}")]
pub struct ParseError {
    /// The line of the offending input.
    pub line: usize,
    /// The column of the offending input.
    pub column: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

/// The kinds of problem the text-format reader reports.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A character that cannot start any token.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    /// A token other than the one the grammar requires.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar requires here.
        expected: &'static str,
        /// The token that was found.
        found: String,
    },

    /// The input ended where the grammar requires more.
    #[error("expected {expected}, found end of input")]
    UnexpectedEnd {
        /// What the grammar requires here.
        expected: &'static str,
    },

    /// A message block was never closed.
    #[error("block opened at line {line}, column {column} is not closed")]
    UnterminatedBlock {
        /// Line of the opening delimiter.
        line: usize,
        /// Column of the opening delimiter.
        column: usize,
    },

    /// A field name the message type does not have.
    #[error("message {message} has no field named '{field}'")]
    UnknownField {
        /// The message type being read.
        message: &'static str,
        /// The field name found.
        field: String,
    },

    /// A singular field given more than once.
    #[error("field '{0}' is specified more than once")]
    DuplicateField(String),

    /// A version lists the same module twice.
    #[error("module {0} is listed more than once in the same version")]
    DuplicateModule(SdkModule),

    /// An integer literal that cannot be read.
    #[error("invalid integer '{0}'")]
    InvalidInteger(String),

    /// A module name that is not in the catalog.
    #[error("unknown module '{0}'")]
    UnknownModule(String),

    /// A module code that is not in the catalog.
    #[error("unknown module code {0}")]
    UnknownModuleCode(i64),

    /// An SDK level that is negative or too large.
    #[error(transparent)]
    Level(#[from] InvalidLevelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Location {
    line: usize,
    column: usize,
}

impl Location {
    fn error(self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Integer(String),
    Colon,
    Separator(char),
    Open(char),
    Close(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "'{name}'"),
            Self::Integer(literal) => write!(f, "integer {literal}"),
            Self::Colon => write!(f, "':'"),
            Self::Separator(c) | Self::Open(c) | Self::Close(c) => write!(f, "'{c}'"),
        }
    }
}

/// Splits the input into tokens, dropping whitespace and comments.
fn tokenize(input: &str) -> Result<(Vec<(Token, Location)>, Location), ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut here = Location { line: 1, column: 1 };

    let advance = |here: &mut Location, c: char| {
        if c == '\n' {
            here.line += 1;
            here.column = 1;
        } else {
            here.column += 1;
        }
    };

    while let Some(&c) = chars.peek() {
        let start = here;

        if c.is_whitespace() {
            chars.next();
            advance(&mut here, c);
            continue;
        }

        if c == '#' {
            while let Some(&c) = chars.peek() {
                if c == '\n' {
                    break;
                }
                chars.next();
                advance(&mut here, c);
            }
            continue;
        }

        let token = match c {
            ':' => Token::Colon,
            ',' | ';' => Token::Separator(c),
            '{' | '<' | '[' => Token::Open(c),
            '}' | '>' | ']' => Token::Close(c),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    chars.next();
                    advance(&mut here, c);
                }
                tokens.push((Token::Ident(name), start));
                continue;
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut literal = String::from(c);
                chars.next();
                advance(&mut here, c);
                while let Some(&c) = chars.peek() {
                    if !c.is_ascii_alphanumeric() {
                        break;
                    }
                    literal.push(c);
                    chars.next();
                    advance(&mut here, c);
                }
                tokens.push((Token::Integer(literal), start));
                continue;
            }
            other => return Err(start.error(ParseErrorKind::UnexpectedCharacter(other))),
        };

        chars.next();
        advance(&mut here, c);
        tokens.push((token, start));
    }

    Ok((tokens, here))
}

/// Parses an integer literal: optional `-`, then `0x` hexadecimal, `0`
/// octal, or decimal.
fn parse_integer(literal: &str) -> Option<i64> {
    let (negative, digits) = literal
        .strip_prefix('-')
        .map_or((false, literal), |rest| (true, rest));

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would also accept a sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;

    Some(if negative { -magnitude } else { magnitude })
}

/// A field name that has just been read, and where it was.
struct Field {
    name: String,
    location: Location,
}

impl Field {
    fn unknown(&self, message: &'static str) -> ParseError {
        self.location.error(ParseErrorKind::UnknownField {
            message,
            field: self.name.clone(),
        })
    }

    fn set_once<T>(&self, slot: &mut Option<T>, value: T) -> Result<(), ParseError> {
        if slot.is_some() {
            return Err(self
                .location
                .error(ParseErrorKind::DuplicateField(self.name.clone())));
        }
        *slot = Some(value);
        Ok(())
    }
}

struct Parser {
    tokens: std::vec::IntoIter<(Token, Location)>,
    peeked: Option<(Token, Location)>,
    end: Location,
}

impl Parser {
    fn new(input: &str) -> Result<Self, ParseError> {
        let (tokens, end) = tokenize(input)?;
        Ok(Self {
            tokens: tokens.into_iter(),
            peeked: None,
            end,
        })
    }

    fn peek(&mut self) -> Option<&(Token, Location)> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next();
        }
        self.peeked.as_ref()
    }

    fn next(&mut self) -> Option<(Token, Location)> {
        self.peeked.take().or_else(|| self.tokens.next())
    }

    fn next_or_end(&mut self, expected: &'static str) -> Result<(Token, Location), ParseError> {
        self.next()
            .ok_or_else(|| self.end.error(ParseErrorKind::UnexpectedEnd { expected }))
    }

    fn unexpected(expected: &'static str, token: &Token, location: Location) -> ParseError {
        location.error(ParseErrorKind::UnexpectedToken {
            expected,
            found: token.to_string(),
        })
    }

    /// Reads fields until the closing delimiter, or the end of input for the
    /// top-level message.
    fn fields<F>(
        &mut self,
        block: Option<(char, Location)>,
        mut field: F,
    ) -> Result<(), ParseError>
    where
        F: FnMut(&mut Self, Field) -> Result<(), ParseError>,
    {
        loop {
            let Some((token, location)) = self.next() else {
                return match block {
                    Some((_, opened)) => Err(self.end.error(ParseErrorKind::UnterminatedBlock {
                        line: opened.line,
                        column: opened.column,
                    })),
                    None => Ok(()),
                };
            };

            let name = match token {
                Token::Close(c) if block.is_some_and(|(close, _)| close == c) => return Ok(()),
                Token::Ident(name) => name,
                other => return Err(Self::unexpected("a field name", &other, location)),
            };

            field(self, Field { name, location })?;

            if matches!(self.peek(), Some((Token::Separator(_), _))) {
                self.next();
            }
        }
    }

    /// Reads the value of a repeated message field: either one message or a
    /// `[...]` list of them, each handed to `element`.
    fn repeated<F>(&mut self, mut element: F) -> Result<(), ParseError>
    where
        F: FnMut(&mut Self) -> Result<(), ParseError>,
    {
        self.optional_colon();
        if !matches!(self.peek(), Some((Token::Open('['), _))) {
            return element(self);
        }
        self.next();

        if matches!(self.peek(), Some((Token::Close(']'), _))) {
            self.next();
            return Ok(());
        }
        loop {
            element(self)?;
            match self.next_or_end("',' or ']'")? {
                (Token::Separator(','), _) => {}
                (Token::Close(']'), _) => return Ok(()),
                (other, location) => {
                    return Err(Self::unexpected("',' or ']'", &other, location));
                }
            }
        }
    }

    fn optional_colon(&mut self) {
        if matches!(self.peek(), Some((Token::Colon, _))) {
            self.next();
        }
    }

    /// Reads the opening delimiter of a message and returns its closing one.
    fn message_start(&mut self) -> Result<(char, Location), ParseError> {
        match self.next_or_end("'{'")? {
            (Token::Open('{'), location) => Ok(('}', location)),
            (Token::Open('<'), location) => Ok(('>', location)),
            (other, location) => Err(Self::unexpected("'{'", &other, location)),
        }
    }

    fn colon(&mut self) -> Result<(), ParseError> {
        match self.next_or_end("':'")? {
            (Token::Colon, _) => Ok(()),
            (other, location) => Err(Self::unexpected("':'", &other, location)),
        }
    }

    fn integer(&mut self) -> Result<(i64, Location), ParseError> {
        self.colon()?;
        match self.next_or_end("an integer")? {
            (Token::Integer(literal), location) => parse_integer(&literal)
                .map(|value| (value, location))
                .ok_or_else(|| location.error(ParseErrorKind::InvalidInteger(literal))),
            (other, location) => Err(Self::unexpected("an integer", &other, location)),
        }
    }

    fn level(&mut self) -> Result<SdkLevel, ParseError> {
        let (value, location) = self.integer()?;
        SdkLevel::try_from(value).map_err(|e| location.error(e.into()))
    }

    fn module(&mut self) -> Result<SdkModule, ParseError> {
        self.colon()?;
        match self.next_or_end("a module")? {
            (Token::Ident(name), location) => SdkModule::from_name(&name)
                .map_err(|_| location.error(ParseErrorKind::UnknownModule(name))),
            (Token::Integer(literal), location) => {
                let code = parse_integer(&literal)
                    .ok_or_else(|| location.error(ParseErrorKind::InvalidInteger(literal)))?;
                i32::try_from(code)
                    .ok()
                    .and_then(SdkModule::from_code)
                    .ok_or_else(|| location.error(ParseErrorKind::UnknownModuleCode(code)))
            }
            (other, location) => Err(Self::unexpected("a module", &other, location)),
        }
    }

    fn extension_version(&mut self) -> Result<ExtensionVersion, ParseError> {
        let block = self.message_start()?;
        let mut version = None;
        let mut requirements: Vec<Requirement> = Vec::new();

        self.fields(Some(block), |parser, field| match field.name.as_str() {
            "version" => field.set_once(&mut version, parser.level()?),
            "requirements" => parser.repeated(|parser| {
                let requirement = parser.requirement()?;
                if requirements.iter().any(|r| r.module == requirement.module) {
                    return Err(field
                        .location
                        .error(ParseErrorKind::DuplicateModule(requirement.module)));
                }
                requirements.push(requirement);
                Ok(())
            }),
            _ => Err(field.unknown("ExtensionVersion")),
        })?;

        Ok(ExtensionVersion::new(
            version.unwrap_or_default(),
            requirements,
        ))
    }

    fn requirement(&mut self) -> Result<Requirement, ParseError> {
        let block = self.message_start()?;
        let mut module = None;
        let mut version = None;

        self.fields(Some(block), |parser, field| match field.name.as_str() {
            "module" => field.set_once(&mut module, parser.module()?),
            "version" => field.set_once(&mut version, parser.sdk_version()?),
            _ => Err(field.unknown("ModuleRequirement")),
        })?;

        Ok(Requirement::new(
            module.unwrap_or(SdkModule::Unknown),
            version.unwrap_or_default(),
        ))
    }

    fn sdk_version(&mut self) -> Result<SdkLevel, ParseError> {
        self.optional_colon();
        let block = self.message_start()?;
        let mut version = None;

        self.fields(Some(block), |parser, field| match field.name.as_str() {
            "version" => field.set_once(&mut version, parser.level()?),
            _ => Err(field.unknown("SdkVersion")),
        })?;

        Ok(version.unwrap_or_default())
    }
}
