use std::cell::RefCell;

use subargs::{
    FlagAction, KWSubarg, PSubarg, ParseError, Printer, SubargAction, SubargSpec, SubargValues,
    UserInterface,
};

#[derive(Default)]
struct RecordingInterface {
    messages: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl UserInterface for RecordingInterface {
    fn print(&self, message: String) {
        self.messages.borrow_mut().push(message);
    }

    fn print_error(&self, error: ParseError) {
        self.errors.borrow_mut().push(error.to_string());
    }
}

fn translate_spec() -> SubargSpec<String> {
    SubargSpec::new(
        vec![
            PSubarg::new("in_file").help("path to input file"),
            PSubarg::new("out_file").optional(),
        ],
        vec![KWSubarg::new("lterm")
            .optional("\n".to_string())
            .help("line termination characters")],
    )
    .unwrap()
}

#[test]
fn translate_flag() {
    let mut results: Vec<SubargValues<String>> = Vec::default();
    let mut action = SubargAction::new("translate", translate_spec(), &mut results);
    let interface = RecordingInterface::default();

    action
        .invoke(&["/path/to/in_file", "lterm=\r\n"], &interface)
        .unwrap();
    drop(action);

    assert!(interface.errors.borrow().is_empty());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("in_file"), Some(&"/path/to/in_file".to_string()));
    assert_eq!(results[0].get("lterm"), Some(&"\r\n".to_string()));
    // The optional positional slot was not supplied, so it is omitted.
    assert!(!results[0].contains("out_file"));
}

#[test]
fn translate_flag_missing_subarg() {
    let mut results: Vec<SubargValues<String>> = Vec::default();
    let mut action = SubargAction::new("translate", translate_spec(), &mut results);
    let interface = RecordingInterface::default();

    let error_code = action.invoke(&["lterm=\n"], &interface).unwrap_err();
    drop(action);

    assert_eq!(error_code, 1);
    assert!(results.is_empty());

    let errors = interface.errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("[translate]"), "unexpected: {}", errors[0]);
    assert!(
        errors[0].contains("missing required positional sub-argument 'in_file'"),
        "unexpected: {}",
        errors[0]
    );
}

#[test]
fn translate_flag_too_many_subargs() {
    let mut results: Vec<SubargValues<String>> = Vec::default();
    let mut action = SubargAction::new("translate", translate_spec(), &mut results);

    let error = action
        .apply(&["/path/to/in_file", "/path/to/out_file", "/additional/path"])
        .unwrap_err();

    assert!(
        error.to_string().contains("too many positional sub-arguments"),
        "unexpected: {error}"
    );
}

#[test]
fn repeated_flag_accumulates() {
    let mut results: Vec<SubargValues<String>> = Vec::default();
    let mut action = SubargAction::new("translate", translate_spec(), &mut results);

    action.apply(&["/path/to/file1"]).unwrap();
    action.apply(&["/path/to/file2", "lterm=;"]).unwrap();
    drop(action);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].get("lterm"), Some(&"\n".to_string()));
    assert_eq!(results[1].get("lterm"), Some(&";".to_string()));
}

#[test]
fn typed_subargs() {
    let spec: SubargSpec<u32> = SubargSpec::new(
        vec![PSubarg::new("level")],
        vec![KWSubarg::new("count").optional(1)],
    )
    .unwrap();
    let mut results: Vec<SubargValues<u32>> = Vec::default();
    let mut action = SubargAction::new("verbosity", spec, &mut results);

    action.apply(&["5", "count=3"]).unwrap();
    let error = action.apply(&["not-u32"]).unwrap_err();
    drop(action);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("level"), Some(&5));
    assert_eq!(results[0].get("count"), Some(&3));
    assert!(
        error.to_string().contains("cannot convert 'not-u32' for 'level'"),
        "unexpected: {error}"
    );
}

#[test]
fn help_text() {
    let printer = Printer::new(&translate_spec());
    let interface = RecordingInterface::default();

    printer.print_help("translate", &interface);

    let message = interface.messages.borrow().join("\n");
    assert!(
        message.contains("usage: --translate { in_file [out_file] [lterm=LTERM] }"),
        "unexpected: {message}"
    );
    assert!(message.contains("path to input file"), "unexpected: {message}");
    assert!(
        message.contains("line termination characters"),
        "unexpected: {message}"
    );
}
