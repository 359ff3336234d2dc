//! 抓包回放端到端测试

use std::fs;
use std::path::PathBuf;

use ipmidump_app::{dump, run, DumpConfig, DumpError, ReplayTransport, TransportSource};
use ipmidump_core::TextPolicy;
use ipmidump_decoder::SectionAssembler;
use serde_json::{json, Value};

const CAPTURE: &str = r#"{
    "channel": 1,
    "chassis_status": "21 10 01 00",
    "device_id": "20 81 02 05 51 8f 01 02 03 34 12",
    "lan": {
        "0": "00 11 00",
        "3": "00 11 c0 a8 01 01",
        "4": "00 11 02",
        "5": "00 11 aa bb cc dd ee ff",
        "6": "00 11 ff ff ff",
        "8": "00 11 6f 02",
        "10": "00 11 01",
        "16": "00 11 70 75 62 6c 69 63 00 00 00 00 00 00 00 00 00 00 00 00",
        "20": { "error": "parameter not supported" },
        "31": "00 11 00"
    }
}"#;

/// 写入临时抓包文件
fn write_capture(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ipmidump-{}-{name}.json", std::process::id()));
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_replay_record() {
    let transport = ReplayTransport::from_json(CAPTURE).unwrap();
    let mut assembler = SectionAssembler::new(transport);
    let record = assembler.assemble();

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value["lan"],
        json!({
            "set_in_progress": "Set Complete",
            "ip": "192.168.1.1",
            "ip_address_source": "DHCP Address",
            "mac": "aa:bb:cc:dd:ee:ff",
            "rmcp_port": 623,
            "gratuitous_arp": true,
            "arp_responses": false,
            "snmp_community_string": "public",
            "dhcp_enable": false
        })
    );
    assert_eq!(value["device_id"]["manufacturer_id"], json!(0x030201));
    assert_eq!(value["device_id"]["firmware_revision"], json!("2.05"));
    assert_eq!(value["device_id"]["ipmi_version"], json!("1.5"));
    assert_eq!(
        value["current_power_state"]["power_restore_policy"],
        json!("previous")
    );
    assert_eq!(
        value["current_power_state"]["last_power_event"],
        json!("IPMI command")
    );
    assert_eq!(value["chassis_state"]["chassis_intrusion"], json!(true));
    assert!(value.get("front_panel_button").is_none());

    // netmask 长度不符，vlan_id 传输失败
    let stats = assembler.stats();
    assert_eq!(stats.lan.decoded, 8);
    assert_eq!(stats.lan.skipped, 1);
    assert_eq!(stats.lan.failed, 10);
}

#[test]
fn test_run_from_capture_file() {
    let path = write_capture("run", CAPTURE);
    let config = DumpConfig {
        compact: true,
        source: TransportSource::Capture { path: path.clone() },
        ..DumpConfig::default()
    };

    let text = run(&config).unwrap();
    assert!(!text.contains('\n'));
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["lan"]["ip"], json!("192.168.1.1"));

    let _ = fs::remove_file(path);
}

#[test]
fn test_config_file_and_text_policy() {
    let mut lan_text = String::from("00 11");
    for _ in 0..18 {
        lan_text.push_str(" 61");
    }
    let capture = format!(r#"{{ "lan": {{ "16": "{lan_text}" }} }}"#);
    let capture_path = write_capture("policy", &capture);

    let config_path = write_capture(
        "config",
        &json!({
            "text_policy": "absent",
            "source": { "type": "capture", "path": capture_path }
        })
        .to_string(),
    );

    let config = DumpConfig::from_file(&config_path).unwrap();
    assert_eq!(config.text_policy, TextPolicy::Absent);
    let record = dump(&config).unwrap();
    assert!(record.lan.get("snmp_community_string").is_absent());

    let config = DumpConfig {
        text_policy: TextPolicy::WholeBuffer,
        ..config
    };
    let record = dump(&config).unwrap();
    assert_eq!(
        record.lan.get("snmp_community_string").as_str(),
        Some("aaaaaaaaaaaaaaaaaa")
    );

    let _ = fs::remove_file(capture_path);
    let _ = fs::remove_file(config_path);
}

#[test]
fn test_malformed_capture_aborts_run() {
    let path = write_capture("malformed", "{ not json");
    let config = DumpConfig {
        source: TransportSource::Capture { path: path.clone() },
        ..DumpConfig::default()
    };
    assert!(matches!(dump(&config), Err(DumpError::TransportInit(_))));
    let _ = fs::remove_file(path);
}
