use std::fmt::Display;

use terminal_size::{terminal_size, Width};

use crate::interface::UserInterface;
use crate::spec::SubargSpec;

// name, required, help
type PositionalEntry = (String, bool, Option<String>);
// key, required, default rendering, help
type KeywordEntry = (String, bool, Option<String>, Option<String>);

const DEFAULT_WIDTH: usize = 100;

// Allows precisely 3 average words with a space between them.
const MINIMUM_DESCRIPTION_WIDTH: usize = 17;

/// Help renderer for a [`SubargSpec`].
///
/// Snapshots the declarations at construction time; rendering is pure
/// presentation and never invokes converters.
///
/// ### Example
/// ```
/// use subargs::{KWSubarg, PSubarg, Printer, SubargSpec};
///
/// let spec: SubargSpec<String> = SubargSpec::new(
///     vec![PSubarg::new("msg1"), PSubarg::new("msg2")],
///     vec![
///         KWSubarg::new("name"),
///         KWSubarg::new("role").optional("friend".to_string()),
///     ],
/// )
/// .unwrap();
/// let printer = Printer::new(&spec);
///
/// assert_eq!(printer.metavar(), "msg1 msg2 name=NAME [role=ROLE]");
/// ```
pub struct Printer {
    positionals: Vec<PositionalEntry>,
    keywords: Vec<KeywordEntry>,
}

impl Printer {
    /// Snapshot the declarations of `spec` for rendering.
    pub fn new<T: Display>(spec: &SubargSpec<T>) -> Self {
        let positionals = spec
            .positionals()
            .iter()
            .map(|slot| {
                (
                    slot.name().to_string(),
                    slot.is_required(),
                    slot.help_text().map(|text| text.to_string()),
                )
            })
            .collect();
        let keywords = spec
            .keywords()
            .iter()
            .map(|slot| {
                (
                    slot.key().to_string(),
                    slot.is_required(),
                    slot.default().map(|default| default.to_string()),
                    slot.help_text().map(|text| text.to_string()),
                )
            })
            .collect();

        Self {
            positionals,
            keywords,
        }
    }

    /// The one-line grammar summary: positional slot names in declaration order,
    /// then keyword slots as `key=KEY`, optional slots bracketed.
    pub fn metavar(&self) -> String {
        let mut parts = Vec::default();

        for (name, required, _) in &self.positionals {
            if *required {
                parts.push(name.clone());
            } else {
                parts.push(format!("[{name}]"));
            }
        }

        for (key, required, _, _) in &self.keywords {
            let grammar = format!("{key}={k}", k = key.to_ascii_uppercase());

            if *required {
                parts.push(grammar);
            } else {
                parts.push(format!("[{grammar}]"));
            }
        }

        if parts.is_empty() {
            // Nothing declared; the flag takes free-form sub-arguments.
            "...".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Render the full usage text: the metavar summary plus per-slot listings
    /// with help texts and keyword defaults annotated.
    pub fn render(&self) -> String {
        let mut lines = vec![format!("{{ {m} }}", m = self.metavar())];
        lines.extend(self.section_lines(DEFAULT_WIDTH));
        lines.join("\n")
    }

    /// Print the usage text for `flag` through the user interface, wrapped to
    /// the current terminal width.
    pub fn print_help(
        &self,
        flag: impl Into<String>,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let total_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            terminal_width as usize
        } else {
            DEFAULT_WIDTH
        };

        user_interface.print(format!(
            "usage: --{f} {{ {m} }}",
            f = flag.into(),
            m = self.metavar()
        ));

        for line in self.section_lines(total_width) {
            user_interface.print(line);
        }
    }

    fn section_lines(&self, total_width: usize) -> Vec<String> {
        let mut column_width = 0;

        for (name, _, _) in &self.positionals {
            if column_width < name.len() {
                column_width = name.len();
            }
        }

        for (key, _, _, _) in &self.keywords {
            // 'key=KEY'
            if column_width < key.len() * 2 + 1 {
                column_width = key.len() * 2 + 1;
            }
        }

        let description_width = std::cmp::max(
            total_width.saturating_sub(column_width + 3),
            MINIMUM_DESCRIPTION_WIDTH,
        );
        let mut lines = Vec::default();

        if !self.positionals.is_empty() {
            lines.push("".to_string());
            lines.push("positional sub-arguments:".to_string());

            for (name, required, help) in &self.positionals {
                let mut description = help.clone().unwrap_or_default();

                if !required {
                    if !description.is_empty() {
                        description.push(' ');
                    }

                    description.push_str("(optional)");
                }

                emit(&mut lines, column_width, description_width, name, &description);
            }
        }

        if !self.keywords.is_empty() {
            lines.push("".to_string());
            lines.push("keyword sub-arguments:".to_string());

            for (key, _, default, help) in &self.keywords {
                let grammar = format!("{key}={k}", k = key.to_ascii_uppercase());
                let mut description = help.clone().unwrap_or_default();

                if let Some(default) = default {
                    if !description.is_empty() {
                        description.push(' ');
                    }

                    description.push_str(format!("(default: {default})").as_str());
                }

                emit(
                    &mut lines,
                    column_width,
                    description_width,
                    &grammar,
                    &description,
                );
            }
        }

        lines
    }
}

fn emit(
    lines: &mut Vec<String>,
    column_width: usize,
    description_width: usize,
    label: &str,
    description: &str,
) {
    if description.is_empty() {
        lines.push(format!(" {label}"));
        return;
    }

    for (i, part) in chunk(description, description_width).iter().enumerate() {
        if i == 0 {
            lines.push(format!(" {label:column_width$}  {part}"));
        } else {
            lines.push(format!(" {:column_width$}  {part}", ""));
        }
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if word.is_empty() {
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + word.len() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
