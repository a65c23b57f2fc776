use anyhow::{Context as _, bail};
use conversation_service::common::error::AppError;
use conversation_service::common::init;
use conversation_service::common::state::AppState;
use conversation_service::models::filters::Filters;
use conversation_service::settings::AppSettings;
use conversation_service::usecases::conversations;
use serde::Serialize;
use std::process::ExitCode;

const USAGE: &str = "usage: conversation-service <lists|archived> <participant_id> [key=value...]\n       \
                     conversation-service thread <conversation_id> [participant_id] [key=value...]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Lists { participant_id: i64 },
    Archived { participant_id: i64 },
    Thread {
        conversation_id: u64,
        participant_id: Option<i64>,
    },
}

fn parse_args(args: &[String]) -> anyhow::Result<(Command, Vec<(String, String)>)> {
    let [command, target, rest @ ..] = args else {
        bail!(USAGE);
    };

    let (command, rest) = match command.as_str() {
        "lists" => (
            Command::Lists {
                participant_id: target.parse().context("invalid participant id")?,
            },
            rest,
        ),
        "archived" => (
            Command::Archived {
                participant_id: target.parse().context("invalid participant id")?,
            },
            rest,
        ),
        "thread" => {
            let conversation_id = target.parse().context("invalid conversation id")?;
            match rest.split_first() {
                Some((participant, rest)) if !participant.contains('=') => (
                    Command::Thread {
                        conversation_id,
                        participant_id: Some(
                            participant.parse().context("invalid participant id")?,
                        ),
                    },
                    rest,
                ),
                _ => (
                    Command::Thread {
                        conversation_id,
                        participant_id: None,
                    },
                    rest,
                ),
            }
        }
        _ => bail!(USAGE),
    };

    let mut pairs = Vec::with_capacity(rest.len());
    for pair in rest {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("filters must be given as key=value, got {pair:?}");
        };
        pairs.push((key.to_owned(), value.to_owned()));
    }
    Ok((command, pairs))
}

async fn run(state: &AppState, command: Command, filters: &Filters) -> Result<String, AppError> {
    match command {
        Command::Lists { participant_id } => {
            to_json(&conversations::get_lists(state, participant_id, filters).await?)
        }
        Command::Archived { participant_id } => {
            to_json(&conversations::get_archived_lists(state, participant_id, filters).await?)
        }
        Command::Thread {
            conversation_id,
            participant_id,
        } => to_json(
            &conversations::get_messages(state, conversation_id, participant_id, filters).await?,
        ),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, pairs) = parse_args(&args)?;

    let settings = AppSettings::get();
    init::initialize_logging(settings);
    let state = init::initialize_state(settings).await?;

    let result = match Filters::from_pairs(pairs) {
        Ok(filters) => run(&state, command, &filters).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(json) => {
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&e.response())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn lists_takes_participant_and_filters() {
        let (command, pairs) =
            parse_args(&args(&["lists", "7", "founder=false", "paginate=10"])).unwrap();
        assert_eq!(command, Command::Lists { participant_id: 7 });
        assert_eq!(
            pairs,
            vec![
                ("founder".to_owned(), "false".to_owned()),
                ("paginate".to_owned(), "10".to_owned()),
            ]
        );
    }

    #[test]
    fn thread_participant_is_optional() {
        let (command, pairs) = parse_args(&args(&["thread", "3", "orderBy=DESC"])).unwrap();
        assert_eq!(
            command,
            Command::Thread {
                conversation_id: 3,
                participant_id: None,
            }
        );
        assert_eq!(pairs.len(), 1);

        let (command, _) = parse_args(&args(&["thread", "3", "9"])).unwrap();
        assert_eq!(
            command,
            Command::Thread {
                conversation_id: 3,
                participant_id: Some(9),
            }
        );
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse_args(&args(&["lists"])).is_err());
        assert!(parse_args(&args(&["delete", "1"])).is_err());
        assert!(parse_args(&args(&["archived", "x"])).is_err());
        assert!(parse_args(&args(&["lists", "1", "founder"])).is_err());
    }
}
