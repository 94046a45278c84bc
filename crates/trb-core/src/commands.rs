/// What a command expects after its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgShape {
    None,
    Text,
}

/// One row of the command table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub args: ArgShape,
    pub usage: &'static str,
    pub description: &'static str,
}

/// Every command the bot understands, in menu/help order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "start",
        args: ArgShape::None,
        usage: "/start",
        description: "Show the greeting",
    },
    CommandSpec {
        name: "help",
        args: ArgShape::None,
        usage: "/help",
        description: "Show usage",
    },
    CommandSpec {
        name: "templates",
        args: ArgShape::None,
        usage: "/templates",
        description: "List templates being removed",
    },
    CommandSpec {
        name: "addtemplate",
        args: ArgShape::Text,
        usage: "/addtemplate <text>",
        description: "Add a template to remove",
    },
    CommandSpec {
        name: "removetemplate",
        args: ArgShape::Text,
        usage: "/removetemplate <text>",
        description: "Stop removing a template",
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Templates,
    AddTemplate(String),
    RemoveTemplate(String),
    /// A text-shaped command sent without its argument.
    MissingArgument(&'static CommandSpec),
    Unknown(String),
}

/// A command together with the bot it was addressed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: BotCommand,
    /// `name` from `/cmd@name`, without the `@`.
    pub target: Option<String>,
}

impl ParsedCommand {
    /// Parse `/cmd`, `/cmd@botname` or `/cmd <arg>`. Returns `None` for non-commands.
    pub fn parse(text: &str) -> Option<Self> {
        let body = text.trim_start().strip_prefix('/')?;

        let (head, arg) = match body.find(char::is_whitespace) {
            Some(idx) => {
                let sep_len = body[idx..].chars().next().map_or(1, char::len_utf8);
                (&body[..idx], &body[idx + sep_len..])
            }
            None => (body, ""),
        };

        let (name, target) = match head.split_once('@') {
            Some((name, target)) => (name, Some(target).filter(|t| !t.is_empty())),
            None => (head, None),
        };
        let name = name.to_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            command: BotCommand::from_parts(&name, arg),
            target: target.map(str::to_string),
        })
    }

    /// Unaddressed commands are for every bot in the chat. Addressed ones are
    /// only for the bot whose username matches, ignoring case; with no known
    /// username nothing addressed matches.
    pub fn is_for(&self, own_username: Option<&str>) -> bool {
        match (&self.target, own_username) {
            (None, _) => true,
            (Some(target), Some(own)) => target.eq_ignore_ascii_case(own.trim_start_matches('@')),
            (Some(_), None) => false,
        }
    }
}

impl BotCommand {
    fn from_parts(name: &str, arg: &str) -> Self {
        let Some(spec) = lookup(name) else {
            return Self::Unknown(name.to_string());
        };

        if spec.args == ArgShape::Text && arg.trim().is_empty() {
            return Self::MissingArgument(spec);
        }

        match spec.name {
            "start" => Self::Start,
            "help" => Self::Help,
            "templates" => Self::Templates,
            "addtemplate" => Self::AddTemplate(arg.to_string()),
            "removetemplate" => Self::RemoveTemplate(arg.to_string()),
            other => Self::Unknown(other.to_string()),
        }
    }
}

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Human-readable command list for `/help`.
pub fn usage_lines() -> String {
    COMMANDS
        .iter()
        .map(|c| format!("{} - {}", c.usage, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}
