use pickbasic::ast::{ClauseForm, ExprKind, Item, Statement, StatementKind};
use pickbasic::{ParseResult, parse};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse_clean(src: &str) -> ParseResult {
    init_logging();
    let result = parse(src);
    assert!(
        result.diagnostics.is_empty(),
        "parse errors: {:?}",
        result.diagnostics
    );
    result
}

const REPORT: &str = "\
* Customer report
      SUBROUTINE REPORT(FILE.NAME, COUNT)
      EQUATE AM TO CHAR(254)
      DIM TOTALS(10)
      OPEN '', FILE.NAME TO F ELSE
         PRINT 'CANNOT OPEN ':FILE.NAME
         RETURN
      END
      SELECT F
      COUNT = 0
10    READNEXT ID ELSE GOTO 99
      READ REC FROM F, ID THEN
         COUNT = COUNT + 1
         BEGIN CASE
            CASE REC<1> = 'A'
               TOTALS(1) = TOTALS(1) + REC<2>
            CASE 1
               NULL
         END CASE
      END ELSE
         CRT 'MISSING ':ID
      END
      GOTO 10
99    PRINT 'DONE':
      RETURN
";

#[test]
fn e2e_report_program_statement_kinds() {
    let result = parse_clean(REPORT);
    let kinds: Vec<_> = result
        .program
        .statements()
        .map(Statement::kind_name)
        .collect();
    assert_eq!(
        kinds,
        vec![
            "subroutine_statement",
            "equate_statement",
            "dim_statement",
            "open_statement",
            "select_statement",
            "assignment_statement",
            "readnext_statement",
            "read_statement",
            "goto_statement",
            "print_statement",
            "return_statement",
        ]
    );
}

#[test]
fn e2e_report_program_keeps_labels_and_comments_in_order() {
    let result = parse_clean(REPORT);
    let items = &result.program.items;
    assert_eq!(items.len(), 14);
    assert!(matches!(items[0], Item::Comment(ref c) if c.text == "* Customer report"));

    let labels: Vec<_> = items
        .iter()
        .filter_map(|item| match item {
            Item::Label(label) => Some(label.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["10", "99"]);
}

#[test]
fn e2e_report_program_read_uses_end_else() {
    let result = parse_clean(REPORT);
    let read = result
        .program
        .statements()
        .find(|s| s.kind_name() == "read_statement")
        .expect("read statement");
    let StatementKind::Read {
        ref address,
        then_else: Some(ref clause),
        ..
    } = read.kind
    else {
        panic!("expected READ with a clause");
    };

    assert!(address.file.is_some());
    assert_eq!(clause.form, ClauseForm::Block);

    let then_branch = clause.then_branch.as_ref().expect("then branch");
    let case = then_branch[1].as_statement().expect("BEGIN CASE");
    let StatementKind::BeginCase { ref cases } = case.kind else {
        panic!("expected BEGIN CASE");
    };
    assert_eq!(cases.len(), 2);
    assert!(matches!(
        cases[0].condition.kind,
        ExprKind::Binary { ref left, .. } if matches!(left.kind, ExprKind::DynamicArrayRef { .. })
    ));

    let else_branch = clause.else_branch.as_ref().expect("else branch");
    assert_eq!(else_branch.len(), 1);
}

#[test]
fn e2e_keyword_case_does_not_change_the_tree() {
    let upper = "\
IF X > 1 THEN PRINT 'BIG' ELSE PRINT 'SMALL'
FOR I = 1 TO 10 STEP 2
  CRT I
NEXT I
LOOP WHILE A MATCHES '1N' DO A = A + 1 REPEAT
READV NAME FROM CUST, ID, 1 ELSE NAME = ''
";
    let lower = upper.to_lowercase();
    let mixed = upper.replace("THEN", "Then").replace("REPEAT", "rePeat");

    let expected = parse_clean(upper).program.to_sexp();
    assert_eq!(parse_clean(&lower).program.to_sexp(), expected);
    assert_eq!(parse_clean(&mixed).program.to_sexp(), expected);
}

#[test]
fn e2e_sexp_carries_field_names() {
    let result = parse_clean("FOR I = 1 TO 5\nNEXT I");
    let sexp = result.program.to_sexp();
    assert!(sexp.starts_with("(source_file (for_statement"));
    assert!(sexp.contains("variable: (identifier)"));
    assert!(sexp.contains("start: (number)"));
    assert!(sexp.contains("end: (number)"));
}

#[test]
fn e2e_line_continuation_joins_lines() {
    let result = parse_clean("X = 1 + &\n   2\nPRINT X");
    assert_eq!(result.program.statements().count(), 2);
    let first = result.program.statements().next().unwrap();
    assert!(matches!(
        first.kind,
        StatementKind::Assignment { ref value, .. } if matches!(value.kind, ExprKind::Binary { .. })
    ));
}

#[test]
fn e2e_file_statements() {
    let src = "\
OPEN 'DICT', 'CUSTOMERS' TO DF ON ERROR STOP ELSE ABORT
WRITEV NAME ON F, ID, 3
MATREADU CUST FROM F, ID LOCKED SLEEP 1 ELSE NULL
MATWRITE CUST TO F, ID
LOCATE CODE IN CODES<1> SETTING POS ELSE POS = 0
DELETE F, ID
LOCK 5 ELSE NULL
UNLOCK 5
RELEASE
CLEARFILE F
READT TAPE.REC ELSE STOP
WRITET TAPE.REC ON 0
REWIND
WEOF 0
PROCREAD LINE ELSE STOP
PROCWRITE LINE
";
    let result = parse_clean(src);
    let kinds: Vec<_> = result
        .program
        .statements()
        .map(Statement::kind_name)
        .collect();
    assert_eq!(
        kinds,
        vec![
            "open_statement",
            "write_statement",
            "matread_statement",
            "matwrite_statement",
            "locate_statement",
            "delete_statement",
            "lock_statement",
            "unlock_statement",
            "release_statement",
            "clearfile_statement",
            "readt_statement",
            "writet_statement",
            "rewind_statement",
            "weof_statement",
            "procread_statement",
            "procwrite_statement",
        ]
    );

    let open = result.program.statements().next().unwrap();
    assert!(matches!(
        open.kind,
        StatementKind::Open { dictionary: Some(_), on_error: Some(_), .. }
    ));
}

#[test]
fn e2e_terminal_and_linkage_statements() {
    let src = "\
PRINT ON 1 'TOTAL', TOTAL
HEADING 'REPORT'
FOOTING 'PAGE'
PAGE 1
PRINTER ON
ECHO OFF
BREAK ON
INPUTERR 'BAD'
INPUTNULL '.'
INPUTTRAP 'X', 100
DATA 1, 2, 3
PROMPT ':'
EXECUTE 'LIST' CAPTURING OUT RETURNING CODES
CHAIN 'RUN BP NEXT.PROG'
ENTER MENU
CALL PROCESS (A, B)
PRECISION 4
RQM
CLEAR
COMMON /SHARED/ A, B
MAT TOTALS = 0
";
    let result = parse_clean(src);
    assert_eq!(result.program.statements().count(), 21);

    let call = result
        .program
        .statements()
        .find(|s| s.kind_name() == "call_statement")
        .unwrap();
    assert!(matches!(
        call.kind,
        StatementKind::Call { ref args, indirect: false, .. } if args.len() == 2
    ));
}
