use crate::core::search::{SearchSession, SubmitPlan};
use crate::domain::model::SelectionField;
use crate::domain::ports::ContactLookup;
use crate::presentation::{self, OutputFormat};
use crate::utils::error::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  region|mc|lc|func|term [ID]   select an option (no ID clears the field)
  options <field>               list the options currently available
  show                          show the current selection
  submit                        search with the current selection
  link                          print the shareable link of the last search
  dismiss                       clear the error message
  help                          show this help
  quit                          leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Select(SelectionField, Option<String>),
    Options(SelectionField),
    Show,
    Submit,
    Link,
    Dismiss,
    Help,
    Quit,
}

/// 解析一行指令；空白行回傳 `Ok(None)`，無法辨識時回傳提示訊息
pub fn parse_command(line: &str) -> std::result::Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next().map(str::to_string);

    if let Some(field) = SelectionField::parse(head) {
        return Ok(Some(ShellCommand::Select(field, arg)));
    }

    let command = match head.to_ascii_lowercase().as_str() {
        "options" | "ls" => {
            let Some(name) = arg else {
                return Err("usage: options <region|mc|lc|func|term>".to_string());
            };
            let field = SelectionField::parse(&name)
                .ok_or_else(|| format!("unknown field '{}'", name))?;
            ShellCommand::Options(field)
        }
        "show" => ShellCommand::Show,
        "submit" | "search" => ShellCommand::Submit,
        "link" => ShellCommand::Link,
        "dismiss" => ShellCommand::Dismiss,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}', type 'help'", other)),
    };
    Ok(Some(command))
}

/// 互動式搜尋：逐行讀取指令直到 `quit` 或輸入結束
pub async fn run_shell<L, R, W>(
    session: &mut SearchSession<L>,
    input: R,
    output: &mut W,
) -> Result<()>
where
    L: ContactLookup,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(output, "Search Contact Info (type 'help' for commands)")?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(output, "{}", message)?;
                continue;
            }
        };

        match command {
            ShellCommand::Select(field, value) => {
                if session.controller_mut().select(field, value.as_deref()) {
                    let state = session.controller().state();
                    let shown = state
                        .get(field)
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "-".to_string());
                    writeln!(output, "{}: {}", field, shown)?;
                } else {
                    writeln!(
                        output,
                        "Unknown {} '{}'",
                        field,
                        value.unwrap_or_default()
                    )?;
                }
            }
            ShellCommand::Options(field) => {
                let options = session.controller().options_for(field);
                writeln!(output, "{}", presentation::render_options(field, &options))?;
            }
            ShellCommand::Show => {
                let state = session.controller().state();
                writeln!(output, "{}", presentation::render_selection(state))?;
            }
            ShellCommand::Submit => submit(session, output).await?,
            ShellCommand::Link => writeln!(output, "{}", session.share_link()?)?,
            ShellCommand::Dismiss => session.dismiss_error(),
            ShellCommand::Help => writeln!(output, "{}", HELP)?,
            ShellCommand::Quit => break,
        }
    }

    Ok(())
}

async fn submit<L: ContactLookup, W: Write>(
    session: &mut SearchSession<L>,
    output: &mut W,
) -> Result<()> {
    if let Ok(SubmitPlan::Fetch { ticket, query }) = session.begin_submit() {
        writeln!(output, "{}", presentation::LOADING_INDICATOR)?;
        let outcome = session.client().lookup(&query).await;
        session.complete(ticket, outcome);
    }

    if let Some(message) = session.error() {
        writeln!(output, "{}", presentation::error_banner(message))?;
    }
    if session.take_reveal() {
        if let Some(results) = session.results() {
            writeln!(
                output,
                "{}",
                presentation::render_results(results, OutputFormat::Table)?
            )?;
        }
    }
    Ok(())
}
