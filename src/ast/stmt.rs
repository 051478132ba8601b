//! Statement nodes.
//!
//! # Statement Categories
//!
//! - **Structure**: SUBROUTINE, END
//! - **Declarations**: DIM, COMMON, EQUATE
//! - **Assignment**: `lvalue = expr`, MAT
//! - **Control flow**: IF, BEGIN CASE, FOR, LOOP, GOTO, GOSUB, ON GOTO, RETURN, STOP, ABORT
//! - **Terminal I/O**: PRINT, CRT, INPUT, INPUT@, HEADING, PAGE, ...
//! - **Files**: OPEN, READ, WRITE, DELETE, MATREAD, LOCATE, ...
//! - **Linkage**: CALL, EXECUTE, CHAIN, ENTER

use super::{Expr, Item, Span};

/// A statement with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Stable node name used by downstream tools and the S-expression dump.
    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }
}

/// A `GOTO`/`GOSUB` destination: one identifier or number token.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub kind: TargetKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Number,
    Identifier,
}

/// Whether a THEN/ELSE clause was written on one line or as a block closed by `END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseForm {
    Inline,
    Block,
}

/// THEN/ELSE branches attached to IF and to file and terminal operations.
///
/// At least one branch is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ThenElse {
    pub then_branch: Option<Vec<Item>>,
    pub else_branch: Option<Vec<Item>>,
    pub form: ClauseForm,
}

/// `WHILE cond` or `UNTIL cond` inside FOR and LOOP.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopCondition {
    pub kind: LoopConditionKind,
    pub condition: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopConditionKind {
    While,
    Until,
}

/// One `CASE expr` clause of a `BEGIN CASE` block.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub condition: Expr,
    pub body: Vec<Item>,
    pub span: Span,
}

/// One array of a DIM statement: `name(rows[, columns])`.
#[derive(Debug, Clone, PartialEq)]
pub struct DimSpec {
    pub name: String,
    pub rows: Expr,
    pub columns: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquateForm {
    /// `EQUATE X TO expr`
    To,
    /// `EQUATE X LITERALLY expr`
    Literally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchMode {
    Goto,
    Gosub,
}

/// Separator written after a PRINT/CRT item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSeparator {
    /// `,` tabs to the next print zone
    Comma,
    /// trailing `:` suppresses the newline
    Colon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintItem {
    pub expr: Expr,
    pub separator: Option<PrintSeparator>,
}

/// Which READ keyword introduced a read statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Read,
    ReadU,
    ReadV,
    ReadVU,
}

impl ReadMode {
    /// READV and READVU address a single attribute.
    pub fn is_attribute_read(&self) -> bool {
        matches!(self, ReadMode::ReadV | ReadMode::ReadVU)
    }
}

/// Which WRITE keyword introduced a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    WriteU,
    WriteV,
    WriteVU,
}

impl WriteMode {
    pub fn is_attribute_write(&self) -> bool {
        matches!(self, WriteMode::WriteV | WriteMode::WriteVU)
    }
}

/// The `[file,] key [, attribute]` operand list of record operations.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordAddress {
    pub file: Option<Expr>,
    pub key: Expr,
    pub attribute: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

/// The different kinds of statements.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    // ==================== Program Structure ====================
    /// `SUBROUTINE [name [(param, ...)]]`
    Subroutine {
        name: Option<String>,
        params: Vec<String>,
    },

    /// Bare `END` outside any block that it could close.
    End,

    // ==================== Declarations ====================
    /// `DIM a(10), b(5, 3)`
    Dim { arrays: Vec<DimSpec> },

    /// `COMMON [/name/] a, b`
    Common {
        block: Option<String>,
        names: Vec<String>,
    },

    /// `EQUATE name TO expr`
    Equate {
        name: String,
        form: EquateForm,
        value: Expr,
    },

    // ==================== Assignment ====================
    /// `lvalue = expr`
    Assignment { target: Expr, value: Expr },

    /// `MAT name = expr`
    Mat { array: String, value: Expr },

    // ==================== Control Flow ====================
    /// `IF cond THEN ... [ELSE ...] [END]`
    If { condition: Expr, then_else: ThenElse },

    /// `BEGIN CASE ... END CASE`
    BeginCase { cases: Vec<CaseClause> },

    /// `FOR var = start TO end [STEP step] [WHILE|UNTIL cond] ... NEXT [var]`
    For {
        variable: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        condition: Option<LoopCondition>,
        body: Vec<Item>,
        next_variable: Option<String>,
    },

    /// `LOOP ... [WHILE|UNTIL cond [DO]] ... REPEAT`
    Loop {
        body_before: Vec<Item>,
        condition: Option<LoopCondition>,
        body_after: Vec<Item>,
    },

    /// `GOTO target` / `GO [TO] target`
    Goto { target: Target },

    /// `GOSUB target` / `GO SUB target`
    Gosub { target: Target },

    /// `ON expr GOTO|GOSUB target, ...`
    OnGoto {
        selector: Expr,
        mode: BranchMode,
        targets: Vec<Target>,
    },

    /// `RETURN [TO target]`
    Return { target: Option<Target> },

    /// `STOP [message]`
    Stop { message: Option<Expr> },

    /// `ABORT [message]`
    Abort { message: Option<Expr> },

    // ==================== Terminal I/O ====================
    /// `PRINT [ON channel] item, item : ...`
    Print {
        channel: Option<Expr>,
        items: Vec<PrintItem>,
    },

    /// `CRT item, ...`
    Crt { items: Vec<PrintItem> },

    /// `INPUT var [, length [:]]`
    Input {
        variable: String,
        length: Option<Expr>,
        suppress_newline: bool,
        then_else: Option<ThenElse>,
    },

    /// `INPUT@(column, row), var [, length [:]]`
    InputAt {
        column: Expr,
        row: Expr,
        variable: String,
        length: Option<Expr>,
        suppress_newline: bool,
        then_else: Option<ThenElse>,
    },

    /// `INPUTERR expr`
    InputErr { message: Expr },

    /// `INPUTNULL expr`
    InputNull { value: Expr },

    /// `INPUTTRAP keys [, target]`
    InputTrap {
        keys: Expr,
        target: Option<Target>,
    },

    /// `DATA expr, ...`
    Data { values: Vec<Expr> },

    /// `PROMPT expr`
    Prompt { value: Expr },

    /// `HEADING expr`
    Heading { text: Expr },

    /// `FOOTING expr`
    Footing { text: Expr },

    /// `PAGE [number]`
    Page { number: Option<Expr> },

    /// `PRINTER ON|OFF`
    Printer { state: Switch },

    /// `BREAK ON|OFF`
    Break { state: Switch },

    /// `ECHO ON|OFF`
    Echo { state: Switch },

    // ==================== Files ====================
    /// `OPEN [dict,] name [TO var] [ON ERROR stmt] THEN|ELSE ...`
    Open {
        dictionary: Option<Expr>,
        file_name: Expr,
        variable: Option<String>,
        on_error: Option<Box<Statement>>,
        then_else: ThenElse,
    },

    /// `READ[U|V|VU] var FROM [file,] key [, attr] [ON ERROR ...] [LOCKED ...] [THEN|ELSE ...]`
    Read {
        mode: ReadMode,
        variable: String,
        address: RecordAddress,
        on_error: Option<Box<Statement>>,
        locked: Option<Box<Statement>>,
        then_else: Option<ThenElse>,
    },

    /// `WRITE[U|V|VU] expr ON|TO [file,] key [, attr] [ON ERROR ...]`
    Write {
        mode: WriteMode,
        value: Expr,
        address: RecordAddress,
        on_error: Option<Box<Statement>>,
    },

    /// `DELETE [file,] key [ON ERROR ...] [THEN|ELSE ...]`
    Delete {
        address: RecordAddress,
        on_error: Option<Box<Statement>>,
        then_else: Option<ThenElse>,
    },

    /// `READNEXT var [THEN|ELSE ...]`
    ReadNext {
        variable: String,
        then_else: Option<ThenElse>,
    },

    /// `READT var [THEN|ELSE ...]`
    ReadT {
        variable: String,
        then_else: Option<ThenElse>,
    },

    /// `WRITET expr ON|TO expr`
    WriteT { value: Expr, unit: Expr },

    /// `SELECT [expr] [TO var]`
    Select {
        source: Option<Expr>,
        list: Option<String>,
    },

    /// `LOCK expr [LOCKED stmt] [THEN|ELSE ...]`
    Lock {
        lock: Expr,
        locked: Option<Box<Statement>>,
        then_else: Option<ThenElse>,
    },

    /// `UNLOCK expr`
    Unlock { lock: Expr },

    /// `RELEASE [expr]`
    Release { target: Option<Expr> },

    /// `CLEARFILE expr [ON ERROR stmt]`
    ClearFile {
        file: Expr,
        on_error: Option<Box<Statement>>,
    },

    /// `MATREAD[U] array FROM [file,] key ...`
    MatRead {
        update_lock: bool,
        array: String,
        address: RecordAddress,
        on_error: Option<Box<Statement>>,
        locked: Option<Box<Statement>>,
        then_else: Option<ThenElse>,
    },

    /// `MATWRITE[U] array ON|TO [file,] key [ON ERROR stmt]`
    MatWrite {
        update_lock: bool,
        array: String,
        address: RecordAddress,
        on_error: Option<Box<Statement>>,
    },

    /// `LOCATE value IN dynamic_array [SETTING var] [THEN|ELSE ...]`
    Locate {
        value: Expr,
        dynamic_array: Expr,
        setting: Option<String>,
        then_else: Option<ThenElse>,
    },

    /// `PROCREAD var [THEN|ELSE ...]`
    ProcRead {
        variable: String,
        then_else: Option<ThenElse>,
    },

    /// `PROCWRITE expr`
    ProcWrite { value: Expr },

    /// `REWIND [expr]`
    Rewind { unit: Option<Expr> },

    /// `WEOF expr`
    Weof { unit: Expr },

    // ==================== Linkage ====================
    /// `EXECUTE expr [CAPTURING var] [RETURNING var]`
    Execute {
        command: Expr,
        capturing: Option<String>,
        returning: Option<String>,
    },

    /// `CHAIN expr`
    Chain { command: Expr },

    /// `ENTER expr`
    Enter { program: Expr },

    /// `CALL name [(args)]` or `CALL @var [(args)]`
    Call {
        name: String,
        indirect: bool,
        args: Vec<Expr>,
    },

    // ==================== Miscellaneous ====================
    /// `PRECISION expr`
    Precision { digits: Expr },

    /// `SLEEP [expr]`
    Sleep { duration: Option<Expr> },

    /// `RQM`
    Rqm,

    /// `NULL`
    Null,

    /// `CLEAR`
    Clear,

    /// Any expression in statement position.
    Expression(Expr),
}

impl StatementKind {
    /// Stable node name for each statement kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StatementKind::Subroutine { .. } => "subroutine_statement",
            StatementKind::End => "end_statement",
            StatementKind::Dim { .. } => "dim_statement",
            StatementKind::Common { .. } => "common_statement",
            StatementKind::Equate { .. } => "equate_statement",
            StatementKind::Assignment { .. } => "assignment_statement",
            StatementKind::Mat { .. } => "mat_statement",
            StatementKind::If { .. } => "if_statement",
            StatementKind::BeginCase { .. } => "begin_case_statement",
            StatementKind::For { .. } => "for_statement",
            StatementKind::Loop { .. } => "loop_statement",
            StatementKind::Goto { .. } => "goto_statement",
            StatementKind::Gosub { .. } => "gosub_statement",
            StatementKind::OnGoto { .. } => "on_goto_statement",
            StatementKind::Return { .. } => "return_statement",
            StatementKind::Stop { .. } => "stop_statement",
            StatementKind::Abort { .. } => "abort_statement",
            StatementKind::Print { .. } => "print_statement",
            StatementKind::Crt { .. } => "crt_statement",
            StatementKind::Input { .. } => "input_statement",
            StatementKind::InputAt { .. } => "input_at_statement",
            StatementKind::InputErr { .. } => "inputerr_statement",
            StatementKind::InputNull { .. } => "inputnull_statement",
            StatementKind::InputTrap { .. } => "inputtrap_statement",
            StatementKind::Data { .. } => "data_statement",
            StatementKind::Prompt { .. } => "prompt_statement",
            StatementKind::Heading { .. } => "heading_statement",
            StatementKind::Footing { .. } => "footing_statement",
            StatementKind::Page { .. } => "page_statement",
            StatementKind::Printer { .. } => "printer_statement",
            StatementKind::Break { .. } => "break_statement",
            StatementKind::Echo { .. } => "echo_statement",
            StatementKind::Open { .. } => "open_statement",
            StatementKind::Read { .. } => "read_statement",
            StatementKind::Write { .. } => "write_statement",
            StatementKind::Delete { .. } => "delete_statement",
            StatementKind::ReadNext { .. } => "readnext_statement",
            StatementKind::ReadT { .. } => "readt_statement",
            StatementKind::WriteT { .. } => "writet_statement",
            StatementKind::Select { .. } => "select_statement",
            StatementKind::Lock { .. } => "lock_statement",
            StatementKind::Unlock { .. } => "unlock_statement",
            StatementKind::Release { .. } => "release_statement",
            StatementKind::ClearFile { .. } => "clearfile_statement",
            StatementKind::MatRead { .. } => "matread_statement",
            StatementKind::MatWrite { .. } => "matwrite_statement",
            StatementKind::Locate { .. } => "locate_statement",
            StatementKind::ProcRead { .. } => "procread_statement",
            StatementKind::ProcWrite { .. } => "procwrite_statement",
            StatementKind::Rewind { .. } => "rewind_statement",
            StatementKind::Weof { .. } => "weof_statement",
            StatementKind::Execute { .. } => "execute_statement",
            StatementKind::Chain { .. } => "chain_statement",
            StatementKind::Enter { .. } => "enter_statement",
            StatementKind::Call { .. } => "call_statement",
            StatementKind::Precision { .. } => "precision_statement",
            StatementKind::Sleep { .. } => "sleep_statement",
            StatementKind::Rqm => "rqm_statement",
            StatementKind::Null => "null_statement",
            StatementKind::Clear => "clear_statement",
            StatementKind::Expression(_) => "expression_statement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;

    fn number(text: &str) -> Expr {
        Expr::new(ExprKind::Number(text.into()), Span::new(0, text.len()))
    }

    #[test]
    fn test_kind_names_are_stable() {
        let stmt = Statement::new(
            StatementKind::For {
                variable: "I".into(),
                start: number("1"),
                end: number("10"),
                step: None,
                condition: None,
                body: Vec::new(),
                next_variable: None,
            },
            Span::new(0, 20),
        );
        assert_eq!(stmt.kind_name(), "for_statement");
        assert_eq!(StatementKind::Rqm.kind_name(), "rqm_statement");
        assert_eq!(
            StatementKind::Expression(number("1")).kind_name(),
            "expression_statement"
        );
    }

    #[test]
    fn test_read_mode_attribute_forms() {
        assert!(ReadMode::ReadV.is_attribute_read());
        assert!(!ReadMode::ReadU.is_attribute_read());
        assert!(WriteMode::WriteVU.is_attribute_write());
    }
}
