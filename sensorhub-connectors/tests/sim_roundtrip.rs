//! The core's output, decoded on the host side
//!
//! Runs the hub over a `ChannelTransport` into memory and checks that every
//! line it wrote decodes into the expected typed message.

use sensorhub_connectors::decode::{decode_lines, HubMessage, MetadataValue, StreamMode};
use sensorhub_connectors::ChannelTransport;
use sensorhub_core::sim::{SimBoard, SimClock};
use sensorhub_core::{HubConfig, SensorHub};

fn run_session(commands: &[&str], duration_ms: u64) -> Vec<HubMessage> {
    let (tx, transport) = ChannelTransport::pair(Vec::new());
    let clock = SimClock::new(0);
    let mut hub =
        SensorHub::new(SimBoard::fully_populated(), transport, clock.clone(), HubConfig::default())
            .unwrap();
    hub.begin().unwrap();

    for command in commands {
        tx.send(command.as_bytes().to_vec()).unwrap();
    }
    let mut elapsed = 0;
    while elapsed < duration_ms {
        clock.advance(10);
        elapsed += 10;
        hub.update().unwrap();
    }

    let (_, transport, _) = hub.into_parts();
    let written = transport.into_writer();
    decode_lines(written.as_slice())
        .collect::<Result<_, _>>()
        .expect("every line decodes")
}

#[test]
fn boot_and_stream() {
    let messages = run_session(&[], 2_000);

    assert!(matches!(&messages[0], HubMessage::Log { message, .. } if message == "Booting Sensor Hub..."));
    let HubMessage::Inventory { sensors, .. } = &messages[1] else {
        panic!("expected INVENTORY, got {:?}", messages[1]);
    };
    assert_eq!(sensors.len(), 6);
    assert_eq!(
        sensors["ANALOG"]["channels"],
        MetadataValue::List(vec!["14".into(), "16".into()])
    );
    assert!(matches!(
        messages[2],
        HubMessage::Heartbeat { ts: 0, interval_ms: 1000, mode: StreamMode::Streaming }
    ));

    let passes: Vec<u64> = messages
        .iter()
        .filter_map(|m| match m {
            HubMessage::Data { sensor, ts, .. } if sensor == "DHT" => Some(*ts),
            _ => None,
        })
        .collect();
    assert_eq!(passes, [1000, 2000]);

    let ultrasonic = messages.iter().find_map(|m| match m {
        HubMessage::Data { sensor, values, .. } if sensor == "HC_SR04" => Some(values),
        _ => None,
    });
    let distance = ultrasonic.unwrap()["distance_cm"];
    assert!((distance - 20.0).abs() < 0.01, "{}", distance);
}

#[test]
fn commands_round_trip() {
    let messages = run_session(&["PING\r\n", "SET_RATE 50\n", "STOP\nSTATUS\n"], 100);

    let replies: Vec<&HubMessage> = messages[3..].iter().collect();
    assert!(matches!(replies[0], HubMessage::Log { message, .. } if message == "PONG"));
    assert!(
        matches!(replies[1], HubMessage::Error { message, .. } if message == "SET_RATE too low (min 100 ms)")
    );
    assert!(matches!(replies[2], HubMessage::Log { message, .. } if message == "Streaming paused"));
    assert_eq!(replies[3].kind(), "INVENTORY");
    assert!(matches!(replies[4], HubMessage::Heartbeat { mode: StreamMode::Paused, .. }));
    assert_eq!(replies.len(), 5);

    let mut last = 0;
    for message in &messages {
        assert!(message.ts() >= last);
        last = message.ts();
    }
}
