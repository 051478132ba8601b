//! The keyword table.
//!
//! Pick BASIC keywords are case-insensitive words. Rather than one lexer
//! pattern per keyword, every word token is looked up here after lexing.
//! The table is built once on first use and never mutated afterwards, so
//! concurrent parses share it without synchronization.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

macro_rules! keywords {
    ($($variant:ident => $spelling:literal),+ $(,)?) => {
        /// Every reserved or contextual word of the dialect.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),+
        }

        impl Keyword {
            /// All keywords, in declaration order.
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant),+];

            /// Canonical (upper-case) spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Keyword::$variant => $spelling),+
                }
            }
        }
    };
}

keywords! {
    // Program structure and declarations
    Subroutine => "SUBROUTINE",
    End => "END",
    Dim => "DIM",
    Dimension => "DIMENSION",
    Common => "COMMON",
    Com => "COM",
    Equate => "EQUATE",
    Equ => "EQU",
    Literally => "LITERALLY",
    Mat => "MAT",

    // Control flow
    If => "IF",
    Then => "THEN",
    Else => "ELSE",
    Begin => "BEGIN",
    Case => "CASE",
    For => "FOR",
    To => "TO",
    Step => "STEP",
    Next => "NEXT",
    While => "WHILE",
    Until => "UNTIL",
    Loop => "LOOP",
    Do => "DO",
    Repeat => "REPEAT",
    Goto => "GOTO",
    Go => "GO",
    Gosub => "GOSUB",
    Sub => "SUB",
    On => "ON",
    Return => "RETURN",
    Stop => "STOP",
    Abort => "ABORT",

    // Terminal I/O
    Print => "PRINT",
    Crt => "CRT",
    Input => "INPUT",
    InputErr => "INPUTERR",
    InputNull => "INPUTNULL",
    InputTrap => "INPUTTRAP",
    Data => "DATA",
    Prompt => "PROMPT",
    Heading => "HEADING",
    Footing => "FOOTING",
    Page => "PAGE",
    Printer => "PRINTER",
    Break => "BREAK",
    Echo => "ECHO",
    Off => "OFF",

    // Files
    Open => "OPEN",
    Read => "READ",
    ReadU => "READU",
    ReadV => "READV",
    ReadVU => "READVU",
    From => "FROM",
    Write => "WRITE",
    WriteU => "WRITEU",
    WriteV => "WRITEV",
    WriteVU => "WRITEVU",
    Delete => "DELETE",
    ReadNext => "READNEXT",
    ReadT => "READT",
    WriteT => "WRITET",
    Select => "SELECT",
    Lock => "LOCK",
    Unlock => "UNLOCK",
    Release => "RELEASE",
    ClearFile => "CLEARFILE",
    MatRead => "MATREAD",
    MatReadU => "MATREADU",
    MatWrite => "MATWRITE",
    MatWriteU => "MATWRITEU",
    Locate => "LOCATE",
    In => "IN",
    Setting => "SETTING",
    ProcRead => "PROCREAD",
    ProcWrite => "PROCWRITE",
    Rewind => "REWIND",
    Weof => "WEOF",
    Error => "ERROR",
    Locked => "LOCKED",

    // Linkage
    Execute => "EXECUTE",
    Capturing => "CAPTURING",
    Returning => "RETURNING",
    Chain => "CHAIN",
    Enter => "ENTER",
    Call => "CALL",

    // Miscellaneous
    Precision => "PRECISION",
    Sleep => "SLEEP",
    Rqm => "RQM",
    Null => "NULL",
    Clear => "CLEAR",
    Rem => "REM",

    // Word operators
    Or => "OR",
    And => "AND",
    Not => "NOT",
    Eq => "EQ",
    Ne => "NE",
    Lt => "LT",
    Gt => "GT",
    Le => "LE",
    Ge => "GE",
    Match => "MATCH",
    Matches => "MATCHES",
    Cat => "CAT",
}

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> =
    Lazy::new(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect());

/// Longest keyword spelling; longer words are never keywords.
const MAX_KEYWORD_LEN: usize = 10;

/// Looks up a word case-insensitively.
///
/// Folding happens in a stack buffer, so the lookup does not allocate.
///
/// ```
/// use pickbasic::lexer::{lookup_keyword, Keyword};
///
/// assert_eq!(lookup_keyword("for"), Some(Keyword::For));
/// assert_eq!(lookup_keyword("Matches"), Some(Keyword::Matches));
/// assert_eq!(lookup_keyword("FORMAT"), None);
/// ```
pub fn lookup_keyword(word: &str) -> Option<Keyword> {
    if word.len() > MAX_KEYWORD_LEN || !word.is_ascii() {
        return None;
    }
    let mut buf = [0u8; MAX_KEYWORD_LEN];
    let folded = &mut buf[..word.len()];
    folded.copy_from_slice(word.as_bytes());
    folded.make_ascii_uppercase();
    let folded = std::str::from_utf8(folded).ok()?;
    KEYWORDS.get(folded).copied()
}

impl Keyword {
    /// Keywords that can begin a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            Keyword::Subroutine
                | Keyword::End
                | Keyword::Dim
                | Keyword::Dimension
                | Keyword::Common
                | Keyword::Com
                | Keyword::Equate
                | Keyword::Equ
                | Keyword::Mat
                | Keyword::If
                | Keyword::Begin
                | Keyword::For
                | Keyword::Loop
                | Keyword::Goto
                | Keyword::Go
                | Keyword::Gosub
                | Keyword::On
                | Keyword::Return
                | Keyword::Stop
                | Keyword::Abort
                | Keyword::Print
                | Keyword::Crt
                | Keyword::Input
                | Keyword::InputErr
                | Keyword::InputNull
                | Keyword::InputTrap
                | Keyword::Data
                | Keyword::Prompt
                | Keyword::Heading
                | Keyword::Footing
                | Keyword::Page
                | Keyword::Printer
                | Keyword::Break
                | Keyword::Echo
                | Keyword::Open
                | Keyword::Read
                | Keyword::ReadU
                | Keyword::ReadV
                | Keyword::ReadVU
                | Keyword::Write
                | Keyword::WriteU
                | Keyword::WriteV
                | Keyword::WriteVU
                | Keyword::Delete
                | Keyword::ReadNext
                | Keyword::ReadT
                | Keyword::WriteT
                | Keyword::Select
                | Keyword::Lock
                | Keyword::Unlock
                | Keyword::Release
                | Keyword::ClearFile
                | Keyword::MatRead
                | Keyword::MatReadU
                | Keyword::MatWrite
                | Keyword::MatWriteU
                | Keyword::Locate
                | Keyword::ProcRead
                | Keyword::ProcWrite
                | Keyword::Rewind
                | Keyword::Weof
                | Keyword::Execute
                | Keyword::Chain
                | Keyword::Enter
                | Keyword::Call
                | Keyword::Precision
                | Keyword::Sleep
                | Keyword::Rqm
                | Keyword::Null
                | Keyword::Clear
        )
    }

    /// Keywords that close or split a block body.
    pub fn is_block_terminator(&self) -> bool {
        matches!(
            self,
            Keyword::End
                | Keyword::Else
                | Keyword::Next
                | Keyword::Repeat
                | Keyword::Case
                | Keyword::While
                | Keyword::Until
        )
    }

    /// Clause words that read as plain identifiers wherever a name or
    /// primary expression is required.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Keyword::Error
                | Keyword::Off
                | Keyword::In
                | Keyword::From
                | Keyword::Setting
                | Keyword::Capturing
                | Keyword::Returning
                | Keyword::Literally
        )
    }

    /// Word spellings of binary operators.
    pub fn is_word_operator(&self) -> bool {
        matches!(
            self,
            Keyword::Or
                | Keyword::And
                | Keyword::Eq
                | Keyword::Ne
                | Keyword::Lt
                | Keyword::Gt
                | Keyword::Le
                | Keyword::Ge
                | Keyword::Match
                | Keyword::Matches
                | Keyword::Cat
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
