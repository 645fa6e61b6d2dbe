use pretty_assertions::assert_eq;
use quickfetch::config::loader::{self, Action, ConfigPaths};
use quickfetch::config::{json, jsonc, OutputMode};
use quickfetch::data::{DisplayInfo, TitleInfo, UptimeInfo};
use quickfetch::probe::DetectResult;
use quickfetch::{render, write_generated_config, Configuration, Logo, Probe};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const DAY_AND_HOUR: u64 = 90_000_000;

/// Fixed answers so reports are reproducible
struct FakeProbe {
    uptime: DetectResult<UptimeInfo>,
}

impl Default for FakeProbe {
    fn default() -> Self {
        FakeProbe {
            uptime: Ok(UptimeInfo {
                uptime: DAY_AND_HOUR,
                boot_time: 1_700_000_000_000,
            }),
        }
    }
}

impl Probe for FakeProbe {
    fn title(&self) -> DetectResult<TitleInfo> {
        Ok(TitleInfo {
            user_name: "ada".into(),
            host_name: "engine".into(),
            fqdn: "engine.example.org".into(),
            ..Default::default()
        })
    }

    fn uptime(&self) -> DetectResult<UptimeInfo> {
        self.uptime.clone()
    }

    fn displays(&self) -> DetectResult<Vec<DisplayInfo>> {
        Ok(vec![DisplayInfo {
            name: "HDMI-1".into(),
            width: 1920,
            height: 1080,
            refresh_rate: 60.0,
            kind: "external".into(),
            primary: true,
        }])
    }
}

fn report(config: &Configuration, probe: &FakeProbe) -> String {
    let mut out = Vec::new();
    render(config, probe, &Logo::none(), &mut out, false).unwrap();
    String::from_utf8(out).unwrap()
}

fn with_structure(structure: &str) -> Configuration {
    let mut config = Configuration::new();
    config.set_structure(structure);
    config
}

fn from_json(text: &str) -> Configuration {
    let mut config = Configuration::new();
    json::load_document(&mut config, &jsonc::parse(text).unwrap());
    config
}

fn no_paths() -> ConfigPaths {
    ConfigPaths {
        config_dirs: Vec::new(),
        data_dirs: Vec::new(),
        exe_dir: None,
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn prints_one_line_per_module() {
    let text = report(&with_structure("Title;Uptime"), &FakeProbe::default());
    assert_eq!(text, "ada@engine\nUptime: 1 day, 1 hour\n");
}

#[test]
fn separator_matches_the_title_width() {
    let text = report(&with_structure("title;separator;break;uptime"), &FakeProbe::default());
    assert_eq!(text, "ada@engine\n----------\n\nUptime: 1 day, 1 hour\n");
}

#[test]
fn json_format_string_replaces_the_value() {
    let config = from_json(
        r#"{
            // only the days
            "modules": [ { "type": "Uptime", "format": "{1} days" } ]
        }"#,
    );
    assert_eq!(report(&config, &FakeProbe::default()), "1 days\n");
}

#[test]
fn unknown_modules_keep_their_place() {
    let text = report(&with_structure("Title;Frobnicator;Uptime"), &FakeProbe::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, ["ada@engine", "Frobnicator: Unknown module", "Uptime: 1 day, 1 hour"]);
}

#[test]
fn detection_errors_are_printed_under_the_key() {
    let probe = FakeProbe {
        uptime: Err("permission denied".into()),
    };
    assert_eq!(report(&with_structure("Uptime"), &probe), "Uptime: permission denied\n");

    let mut quiet = with_structure("Title;Uptime");
    quiet.display.show_errors = false;
    assert_eq!(report(&quiet, &probe), "ada@engine\n");
}

#[test]
fn modules_without_a_probe_answer_report_unsupported() {
    let text = report(&with_structure("Kernel"), &FakeProbe::default());
    assert_eq!(text, "Kernel: Not supported on this platform\n");
}

#[test]
fn json_output_lists_results_and_errors() {
    let mut config = with_structure("Uptime;Kernel;Frobnicator");
    config.output = OutputMode::Json;
    let doc: Value = serde_json::from_str(&report(&config, &FakeProbe::default())).unwrap();

    let items = doc.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["type"], "Uptime");
    assert_eq!(items[0]["result"]["uptime"], DAY_AND_HOUR);
    assert_eq!(items[0]["result"]["bootTime"], 1_700_000_000_000u64);
    assert_eq!(items[1]["error"], "Not supported on this platform");
    assert_eq!(items[2]["type"], "Frobnicator");
    assert_eq!(items[2]["error"], "Unknown module");
}

#[test]
fn generated_config_loads_back_to_the_same_document() {
    let (config, _) = loader::load_with(
        &args(&[
            "--structure",
            "title;uptime;memory;Frobnicator",
            "--separator",
            " -> ",
            "--uptime-key",
            "Up",
            "--size-ndigits",
            "1",
        ]),
        &no_paths(),
        false,
    )
    .unwrap();

    let first = json::to_config_text(&json::generate_document(&config)).unwrap();
    let reloaded = from_json(&first);
    let second = json::to_config_text(&json::generate_document(&reloaded)).unwrap();
    assert_eq!(first, second);

    let doc: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(doc["display"]["separator"], " -> ");
    assert_eq!(doc["modules"][0], "title");
    assert_eq!(doc["modules"][1]["key"], "Up");
    assert_eq!(doc["modules"][3], "Frobnicator");
}

#[test]
fn flags_and_json_configure_the_same_thing() {
    let (from_flags, action) = loader::load_with(
        &args(&["--structure", "title", "--title-color-user", "red"]),
        &no_paths(),
        false,
    )
    .unwrap();
    assert_eq!(action, Action::Render);

    let from_json = from_json(r#"{ "modules": [ { "type": "title", "color": { "user": "red" } } ] }"#);
    assert_eq!(json::generate_document(&from_flags), json::generate_document(&from_json));
}

#[test]
fn flags_win_over_the_user_config() {
    let dir = TempDir::new().unwrap();
    let file = ConfigPaths::config_file(dir.path(), "jsonc");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(
        &file,
        r#"{ "display": { "separator": " = " }, "modules": [ { "type": "uptime", "key": "Up" } ] }"#,
    )
    .unwrap();
    let paths = ConfigPaths {
        config_dirs: vec![dir.path().to_path_buf()],
        data_dirs: Vec::new(),
        exe_dir: None,
    };

    let (config, _) = loader::load_with(&args(&["--uptime-key", "Awake"]), &paths, true).unwrap();
    assert_eq!(report(&config, &FakeProbe::default()), "Awake = 1 day, 1 hour\n");

    let (config, _) = loader::load_with(&[], &paths, false).unwrap();
    assert!(config.structure.is_none());
}

#[test]
fn generated_config_is_not_overwritten_without_force() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("config.jsonc");
    let target_str = target.to_str().unwrap();
    let config = with_structure("title;uptime");

    let mut out = Vec::new();
    write_generated_config(&config, Some(target_str), None, false, &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("config.jsonc"));
    let written = fs::read_to_string(&target).unwrap();

    let err = write_generated_config(&config, Some(target_str), None, false, &mut Vec::new()).unwrap_err();
    assert_eq!(err.exit_code(), 7);

    write_generated_config(&config, Some(target_str), None, true, &mut Vec::new()).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), written);
}

#[test]
fn generated_config_can_go_to_stdout() {
    let config = with_structure("uptime");
    let mut out = Vec::new();
    write_generated_config(&config, Some("-"), None, false, &mut out).unwrap();
    let doc: Value = serde_json::from_str(&String::from_utf8(out).unwrap()).unwrap();
    assert_eq!(doc["modules"][0], "uptime");
}

#[test]
fn gen_config_flag_selects_the_action() {
    let (_, action) = loader::load_with(&args(&["--gen-config", "-"]), &no_paths(), false).unwrap();
    assert_eq!(
        action,
        Action::GenConfig {
            path: Some("-".into()),
            force: false
        }
    );
}

#[test]
fn display_results_use_camel_case_keys() {
    let mut config = with_structure("Display");
    assert_eq!(report(&config, &FakeProbe::default()), "Display: 1920x1080 @ 60 Hz\n");

    config.output = OutputMode::Json;
    let doc: Value = serde_json::from_str(&report(&config, &FakeProbe::default())).unwrap();
    let display = &doc[0]["result"][0];
    assert_eq!(display["type"], "external");
    assert_eq!(display["refreshRate"], 60.0);
    assert_eq!(display["primary"], true);
}
