use crate::config::options::{parse_bool, ModuleArgs};
use crate::config::Configuration;
use crate::data::UserInfo;
use crate::display::PrintContext;
use crate::error::Result;
use crate::format::FormatArg;
use crate::probe::{DetectResult, Probe};
use crate::registry::{create, Module, ModuleDescriptor};
use serde_json::Value;

pub static DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "Users",
    description: "Print the users logged in",
    create: create::<UsersModule>,
    format_args: &[
        ("name", "User name"),
        ("host-name", "Host name the user logged in from"),
        ("session-name", "Terminal line of the session"),
        ("login-time", "Login time (milliseconds since the epoch)"),
    ],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersModule {
    args: ModuleArgs,
    /// One line listing every user instead of one line per session
    pub compact: bool,
}

fn session(user: &UserInfo) -> String {
    let mut text = user.name.clone();
    if !user.host_name.is_empty() {
        text.push('@');
        text.push_str(&user.host_name);
    }
    if !user.tty.is_empty() {
        text.push_str(&format!(" - {}", user.tty));
    }
    text
}

fn compact_line(users: &[UserInfo]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for user in users {
        if !names.contains(&user.name.as_str()) {
            names.push(&user.name);
        }
    }
    names.join(", ")
}

impl Module for UsersModule {
    fn descriptor(&self) -> &'static ModuleDescriptor {
        &DESCRIPTOR
    }

    fn args(&self) -> &ModuleArgs {
        &self.args
    }

    fn args_mut(&mut self) -> &mut ModuleArgs {
        &mut self.args
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }

    fn set_option(&mut self, name: &str, key: &str, value: Option<&str>) -> Result<bool> {
        match name {
            "compact" => self.compact = parse_bool(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn option_values(&self) -> Vec<(&'static str, Value)> {
        vec![("compact", Value::from(self.compact))]
    }

    fn print(&self, ctx: &mut PrintContext<'_>) {
        let users = match ctx.probe.users() {
            Ok(users) => users,
            Err(e) => return ctx.print_error(DESCRIPTOR.name, 0, &self.args, &e),
        };
        if self.compact {
            let line = compact_line(&users);
            let format_args = [FormatArg::Str(&line)];
            return ctx.print_result(DESCRIPTOR.name, 0, &self.args, &[], &format_args, &line);
        }
        for (position, user) in users.iter().enumerate() {
            let index = super::instance_index(position, users.len());
            let format_args = [
                FormatArg::Str(&user.name),
                FormatArg::Str(&user.host_name),
                FormatArg::Str(&user.tty),
                FormatArg::Uint64(user.login_time),
            ];
            ctx.print_result(DESCRIPTOR.name, index, &self.args, &[], &format_args, &session(user));
        }
    }

    fn json_result(&self, _config: &Configuration, probe: &dyn Probe) -> Option<DetectResult<Value>> {
        super::json(probe.users())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Printer;
    use crate::logo::Logo;

    struct Sessions;
    impl Probe for Sessions {
        fn users(&self) -> DetectResult<Vec<UserInfo>> {
            Ok(vec![
                UserInfo {
                    name: "ada".into(),
                    tty: "tty1".into(),
                    login_time: 1_700_000_000_000,
                    ..UserInfo::default()
                },
                UserInfo {
                    name: "ada".into(),
                    host_name: "10.0.0.7".into(),
                    tty: "pts/0".into(),
                    ..UserInfo::default()
                },
                UserInfo {
                    name: "grace".into(),
                    tty: "pts/1".into(),
                    ..UserInfo::default()
                },
            ])
        }
    }

    fn print(module: &UsersModule) -> String {
        let config = Configuration::new();
        let logo = Logo::none();
        let mut out = Vec::new();
        {
            let mut ctx = PrintContext::new(&config, &Sessions, Printer::new(&mut out, &logo, false));
            module.print(&mut ctx);
            ctx.into_printer().finish().unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_line_per_session() {
        assert_eq!(
            print(&UsersModule::default()),
            "Users 1: ada - tty1\nUsers 2: ada@10.0.0.7 - pts/0\nUsers 3: grace - pts/1\n"
        );
    }

    #[test]
    fn compact_lists_each_name_once() {
        let mut module = UsersModule::default();
        module.parse_flag("--users-compact", "compact", None).unwrap();
        assert_eq!(print(&module), "Users: ada, grace\n");
        assert_eq!(module.generate_json_config()["compact"], true);
    }
}
