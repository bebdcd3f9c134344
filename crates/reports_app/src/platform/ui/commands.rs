//! Parsing of the line-oriented command language.

use reports_core::{AppViewModel, Msg, ModalView};

pub const HELP: &str = "\
Commands:
  tenants                         show tenants and the current selection
  toggle <domain|#>               select or deselect a tenant
  generate                        generate reports for the selection
  close | reopen                  hide or show the generation modal
  preview <n> | close-preview     show a generated report
  download <n>                    save a generated report
  login <email> <password>
  register <email> <password> <confirm> <invite>
  logout
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantRef {
    /// 1-indexed position in the tenant list.
    Position(usize),
    Domain(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Show,
    Toggle(TenantRef),
    Generate,
    Close,
    Reopen,
    /// 1-indexed result card.
    Preview(usize),
    ClosePreview,
    /// 1-indexed result card.
    Download(usize),
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        confirm_password: String,
        invite: String,
    },
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{0}` is not a list number")]
    BadNumber(String),
    #[error("no tenant matches `{0}`")]
    NoSuchTenant(String),
    #[error("no result card {0}")]
    NoSuchCard(usize),
}

/// Parses one input line. Blank lines are `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (head.to_ascii_lowercase().as_str(), args) {
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        ("tenants" | "show", _) => Command::Show,
        ("toggle", [target]) => Command::Toggle(match target.parse::<usize>() {
            Ok(position) => TenantRef::Position(position),
            Err(_) => TenantRef::Domain((*target).to_string()),
        }),
        ("toggle", _) => return Err(CommandError::Usage("toggle <domain|#>")),
        ("generate", []) => Command::Generate,
        ("close", []) => Command::Close,
        ("reopen", []) => Command::Reopen,
        ("preview", [n]) => Command::Preview(number(n)?),
        ("preview", _) => return Err(CommandError::Usage("preview <n>")),
        ("close-preview", []) => Command::ClosePreview,
        ("download", [n]) => Command::Download(number(n)?),
        ("download", _) => return Err(CommandError::Usage("download <n>")),
        ("login", [email, password]) => Command::Login {
            email: (*email).to_string(),
            password: (*password).to_string(),
        },
        ("login", _) => return Err(CommandError::Usage("login <email> <password>")),
        ("register", [email, password, confirm, invite]) => Command::Register {
            email: (*email).to_string(),
            password: (*password).to_string(),
            confirm_password: (*confirm).to_string(),
            invite: (*invite).to_string(),
        },
        ("register", _) => {
            return Err(CommandError::Usage(
                "register <email> <password> <confirm> <invite>",
            ))
        }
        ("logout", []) => Command::Logout,
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    Ok(Some(command))
}

fn number(word: &str) -> Result<usize, CommandError> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadNumber(word.to_string())),
    }
}

impl Command {
    /// Resolves list positions against what the user is looking at. `Help`,
    /// `Quit` and `Show` are handled by the front-end and yield `Ok(None)`.
    pub fn into_msg(self, view: &AppViewModel) -> Result<Option<Msg>, CommandError> {
        let msg = match self {
            Command::Help | Command::Quit | Command::Show => return Ok(None),
            Command::Toggle(TenantRef::Position(position)) => {
                let row = position
                    .checked_sub(1)
                    .and_then(|index| view.tenants.get(index))
                    .ok_or_else(|| CommandError::NoSuchTenant(position.to_string()))?;
                Msg::TenantToggled(row.domain.clone())
            }
            Command::Toggle(TenantRef::Domain(domain)) => {
                let row = view
                    .tenants
                    .iter()
                    .find(|row| row.domain.eq_ignore_ascii_case(&domain))
                    .ok_or(CommandError::NoSuchTenant(domain))?;
                Msg::TenantToggled(row.domain.clone())
            }
            Command::Generate => Msg::GenerateClicked,
            Command::Close => Msg::ModalCloseClicked,
            Command::Reopen => Msg::ModalReopenClicked,
            Command::Preview(card) => Msg::PreviewRequested {
                index: card_index(view, card)?,
            },
            Command::ClosePreview => Msg::PreviewClosed,
            Command::Download(card) => Msg::DownloadRequested {
                index: card_index(view, card)?,
            },
            Command::Login { email, password } => Msg::LoginSubmitted { email, password },
            Command::Register {
                email,
                password,
                confirm_password,
                invite,
            } => Msg::RegisterSubmitted {
                email,
                password,
                confirm_password,
                invite,
            },
            Command::Logout => Msg::LogoutClicked,
        };
        Ok(Some(msg))
    }
}

fn card_index(view: &AppViewModel, card: usize) -> Result<usize, CommandError> {
    match &view.modal {
        ModalView::ShowingResults { cards } if (1..=cards.len()).contains(&card) => Ok(card - 1),
        _ => Err(CommandError::NoSuchCard(card)),
    }
}
