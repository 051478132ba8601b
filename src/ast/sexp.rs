//! S-expression rendering of the syntax tree.
//!
//! The output mirrors the node and field naming used by tree-sitter tooling:
//!
//! ```text
//! (source_file (for_statement variable: (identifier) start: (number) end: (number)))
//! ```
//!
//! Identifier and literal text is omitted so the dump describes structure only;
//! operators are kept in their canonical spelling.

use super::{
    CaseClause, Expr, ExprKind, Item, LoopCondition, PrintItem, Program, RecordAddress, Statement,
    StatementKind, Target, ThenElse,
};

impl Program {
    /// Renders the program as a single-line S-expression.
    ///
    /// # Example
    ///
    /// ```
    /// let result = pickbasic::parse("X = 1");
    /// assert_eq!(
    ///     result.program.to_sexp(),
    ///     "(source_file (assignment_statement target: (identifier) value: (number)))"
    /// );
    /// ```
    pub fn to_sexp(&self) -> String {
        let mut w = SexpWriter::default();
        w.open("source_file");
        w.items(&self.items);
        w.close();
        w.output
    }
}

#[derive(Default)]
struct SexpWriter {
    output: String,
}

impl SexpWriter {
    fn open(&mut self, name: &str) {
        if !self.output.is_empty() && !self.output.ends_with('(') && !self.output.ends_with(' ') {
            self.output.push(' ');
        }
        self.output.push('(');
        self.output.push_str(name);
    }

    fn close(&mut self) {
        self.output.push(')');
    }

    fn leaf(&mut self, name: &str) {
        self.open(name);
        self.close();
    }

    fn field_label(&mut self, field: &str) {
        self.output.push(' ');
        self.output.push_str(field);
        self.output.push_str(": ");
    }

    fn field(&mut self, field: &str, expr: &Expr) {
        self.field_label(field);
        self.expr(expr);
    }

    fn opt_field(&mut self, field: &str, expr: Option<&Expr>) {
        if let Some(expr) = expr {
            self.field(field, expr);
        }
    }

    fn name_field(&mut self, field: &str) {
        self.field_label(field);
        self.leaf("identifier");
    }

    fn opt_name_field(&mut self, field: &str, name: Option<&String>) {
        if name.is_some() {
            self.name_field(field);
        }
    }

    fn target(&mut self, target: &Target) {
        match target.kind {
            super::TargetKind::Number => self.leaf("label_name"),
            super::TargetKind::Identifier => self.leaf("identifier"),
        }
    }

    fn items(&mut self, items: &[Item]) {
        for item in items {
            match item {
                Item::Statement(stmt) => self.statement(stmt),
                Item::Label(_) => {
                    self.open("label");
                    self.output.push_str(" name: (label_name)");
                    self.close();
                }
                Item::Comment(_) => self.leaf("comment"),
            }
        }
    }

    fn then_else(&mut self, clause: &ThenElse) {
        if let Some(body) = &clause.then_branch {
            self.open("then_clause");
            self.items(body);
            self.close();
        }
        if let Some(body) = &clause.else_branch {
            self.open("else_clause");
            self.items(body);
            self.close();
        }
    }

    fn opt_then_else(&mut self, clause: Option<&ThenElse>) {
        if let Some(clause) = clause {
            self.then_else(clause);
        }
    }

    fn clause_statement(&mut self, name: &str, stmt: Option<&Statement>) {
        if let Some(stmt) = stmt {
            self.open(name);
            self.statement(stmt);
            self.close();
        }
    }

    fn address(&mut self, address: &RecordAddress) {
        self.opt_field("file", address.file.as_ref());
        self.field("key", &address.key);
        self.opt_field("attribute", address.attribute.as_ref());
    }

    fn loop_condition(&mut self, condition: Option<&LoopCondition>) {
        if let Some(cond) = condition {
            self.field("condition", &cond.condition);
        }
    }

    fn print_items(&mut self, items: &[PrintItem]) {
        if items.is_empty() {
            return;
        }
        self.open("print_list");
        for item in items {
            self.output.push(' ');
            self.expr(&item.expr);
        }
        self.close();
    }

    fn case_clause(&mut self, clause: &CaseClause) {
        self.open("case_clause");
        self.field("condition", &clause.condition);
        self.items(&clause.body);
        self.close();
    }

    fn statement(&mut self, stmt: &Statement) {
        self.open(stmt.kind_name());
        match &stmt.kind {
            StatementKind::Subroutine { name, params } => {
                self.opt_name_field("name", name.as_ref());
                for _ in params {
                    self.name_field("parameter");
                }
            }
            StatementKind::End
            | StatementKind::Rqm
            | StatementKind::Null
            | StatementKind::Clear
            | StatementKind::Printer { .. }
            | StatementKind::Break { .. }
            | StatementKind::Echo { .. } => {}
            StatementKind::Dim { arrays } => {
                for spec in arrays {
                    self.open("dim_spec");
                    self.name_field("name");
                    self.field("rows", &spec.rows);
                    self.opt_field("columns", spec.columns.as_ref());
                    self.close();
                }
            }
            StatementKind::Common { block, names } => {
                self.opt_name_field("block", block.as_ref());
                for _ in names {
                    self.name_field("variable");
                }
            }
            StatementKind::Equate { value, .. } => {
                self.name_field("name");
                self.field("value", value);
            }
            StatementKind::Assignment { target, value } => {
                self.field("target", target);
                self.field("value", value);
            }
            StatementKind::Mat { value, .. } => {
                self.name_field("array");
                self.field("value", value);
            }
            StatementKind::If {
                condition,
                then_else,
            } => {
                self.field("condition", condition);
                self.then_else(then_else);
            }
            StatementKind::BeginCase { cases } => {
                for clause in cases {
                    self.case_clause(clause);
                }
            }
            StatementKind::For {
                start,
                end,
                step,
                condition,
                body,
                next_variable,
                ..
            } => {
                self.name_field("variable");
                self.field("start", start);
                self.field("end", end);
                self.opt_field("step", step.as_ref());
                self.loop_condition(condition.as_ref());
                self.items(body);
                self.opt_name_field("next", next_variable.as_ref());
            }
            StatementKind::Loop {
                body_before,
                condition,
                body_after,
            } => {
                if !body_before.is_empty() {
                    self.open("loop_body_before");
                    self.items(body_before);
                    self.close();
                }
                self.loop_condition(condition.as_ref());
                if !body_after.is_empty() {
                    self.open("loop_body_after");
                    self.items(body_after);
                    self.close();
                }
            }
            StatementKind::Goto { target } | StatementKind::Gosub { target } => {
                self.target(target);
            }
            StatementKind::OnGoto {
                selector, targets, ..
            } => {
                self.field("selector", selector);
                for target in targets {
                    self.target(target);
                }
            }
            StatementKind::Return { target } => {
                if let Some(target) = target {
                    self.target(target);
                }
            }
            StatementKind::Stop { message } | StatementKind::Abort { message } => {
                self.opt_field("message", message.as_ref());
            }
            StatementKind::Print { channel, items } => {
                self.opt_field("channel", channel.as_ref());
                self.print_items(items);
            }
            StatementKind::Crt { items } => self.print_items(items),
            StatementKind::Input {
                length, then_else, ..
            } => {
                self.name_field("variable");
                self.opt_field("length", length.as_ref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::InputAt {
                column,
                row,
                length,
                then_else,
                ..
            } => {
                self.field("column", column);
                self.field("row", row);
                self.name_field("variable");
                self.opt_field("length", length.as_ref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::InputErr { message } => self.field("message", message),
            StatementKind::InputNull { value } | StatementKind::Prompt { value } => {
                self.field("value", value)
            }
            StatementKind::InputTrap { keys, target } => {
                self.field("keys", keys);
                if let Some(target) = target {
                    self.target(target);
                }
            }
            StatementKind::Data { values } => {
                for value in values {
                    self.output.push(' ');
                    self.expr(value);
                }
            }
            StatementKind::Heading { text } | StatementKind::Footing { text } => {
                self.field("text", text)
            }
            StatementKind::Page { number } => self.opt_field("number", number.as_ref()),
            StatementKind::Open {
                dictionary,
                file_name,
                variable,
                on_error,
                then_else,
            } => {
                self.opt_field("dictionary", dictionary.as_ref());
                self.field("file_name", file_name);
                self.opt_name_field("variable", variable.as_ref());
                self.clause_statement("on_error_clause", on_error.as_deref());
                self.then_else(then_else);
            }
            StatementKind::Read {
                address,
                on_error,
                locked,
                then_else,
                ..
            } => {
                self.name_field("variable");
                self.address(address);
                self.clause_statement("on_error_clause", on_error.as_deref());
                self.clause_statement("locked_clause", locked.as_deref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::Write {
                value,
                address,
                on_error,
                ..
            } => {
                self.field("value", value);
                self.address(address);
                self.clause_statement("on_error_clause", on_error.as_deref());
            }
            StatementKind::Delete {
                address,
                on_error,
                then_else,
            } => {
                self.address(address);
                self.clause_statement("on_error_clause", on_error.as_deref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::ReadNext { then_else, .. }
            | StatementKind::ReadT { then_else, .. }
            | StatementKind::ProcRead { then_else, .. } => {
                self.name_field("variable");
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::WriteT { value, unit } => {
                self.field("value", value);
                self.field("unit", unit);
            }
            StatementKind::Select { source, list } => {
                self.opt_field("source", source.as_ref());
                self.opt_name_field("list", list.as_ref());
            }
            StatementKind::Lock {
                lock,
                locked,
                then_else,
            } => {
                self.field("lock", lock);
                self.clause_statement("locked_clause", locked.as_deref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::Unlock { lock } => self.field("lock", lock),
            StatementKind::Release { target } => self.opt_field("target", target.as_ref()),
            StatementKind::ClearFile { file, on_error } => {
                self.field("file", file);
                self.clause_statement("on_error_clause", on_error.as_deref());
            }
            StatementKind::MatRead {
                address,
                on_error,
                locked,
                then_else,
                ..
            } => {
                self.name_field("array");
                self.address(address);
                self.clause_statement("on_error_clause", on_error.as_deref());
                self.clause_statement("locked_clause", locked.as_deref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::MatWrite {
                address, on_error, ..
            } => {
                self.name_field("array");
                self.address(address);
                self.clause_statement("on_error_clause", on_error.as_deref());
            }
            StatementKind::Locate {
                value,
                dynamic_array,
                setting,
                then_else,
            } => {
                self.field("value", value);
                self.field("dynamic_array", dynamic_array);
                self.opt_name_field("setting", setting.as_ref());
                self.opt_then_else(then_else.as_ref());
            }
            StatementKind::ProcWrite { value } => self.field("value", value),
            StatementKind::Rewind { unit } => self.opt_field("unit", unit.as_ref()),
            StatementKind::Weof { unit } => self.field("unit", unit),
            StatementKind::Execute {
                command,
                capturing,
                returning,
            } => {
                self.field("command", command);
                self.opt_name_field("capturing", capturing.as_ref());
                self.opt_name_field("returning", returning.as_ref());
            }
            StatementKind::Chain { command } => self.field("command", command),
            StatementKind::Enter { program } => self.field("program", program),
            StatementKind::Call { indirect, args, .. } => {
                self.field_label("name");
                self.leaf(if *indirect { "at_variable" } else { "identifier" });
                for arg in args {
                    self.output.push(' ');
                    self.expr(arg);
                }
            }
            StatementKind::Precision { digits } => self.field("digits", digits),
            StatementKind::Sleep { duration } => self.opt_field("duration", duration.as_ref()),
            StatementKind::Expression(expr) => {
                self.output.push(' ');
                self.expr(expr);
            }
        }
        self.close();
    }

    fn expr(&mut self, expr: &Expr) {
        self.open(expr.kind.kind_name());
        match &expr.kind {
            ExprKind::Binary { left, op, right } => {
                self.field("left", left);
                self.output.push_str(" operator: \"");
                self.output.push_str(op.as_str());
                self.output.push('"');
                self.field("right", right);
            }
            ExprKind::Unary { op, operand } => {
                self.output.push_str(" operator: \"");
                self.output.push_str(op.as_str());
                self.output.push('"');
                self.field("operand", operand);
            }
            ExprKind::Identifier(_)
            | ExprKind::Number(_)
            | ExprKind::String { .. }
            | ExprKind::AtVariable(_) => {}
            ExprKind::FunctionCall { args, .. } => {
                self.name_field("name");
                for arg in args {
                    self.output.push(' ');
                    self.expr(arg);
                }
            }
            ExprKind::DynamicArrayRef {
                attribute,
                value,
                sub_value,
                ..
            } => {
                self.name_field("name");
                self.field("attribute", attribute);
                self.opt_field("value", value.as_deref());
                self.opt_field("sub_value", sub_value.as_deref());
            }
            ExprKind::SubstringRef {
                start, length, ..
            } => {
                self.name_field("name");
                self.field("start", start);
                self.opt_field("length", length.as_deref());
            }
            ExprKind::AtExpression { column, row } => {
                self.field("column", column);
                self.opt_field("row", row.as_deref());
            }
            ExprKind::Parenthesized(inner) => {
                self.output.push(' ');
                self.expr(inner);
            }
        }
        self.close();
    }
}
