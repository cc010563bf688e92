//! End-to-end session tests against the simulated module.

use loramesh_link::sim::SimulatedModule;
use loramesh_link::{LinkError, LinkSession, SessionConfig};
use loramesh_protocol::{
    AddressWidth, Bandwidth, CodingRate, PowerClass, ProtocolError, RadioParams, Revision,
    RxWindow, CMD_LORA_PARAMETER,
};

fn session_with(module: SimulatedModule) -> LinkSession<SimulatedModule> {
    LinkSession::new(module, SessionConfig::fast())
}

fn radio_params() -> RadioParams {
    RadioParams {
        power: 20,
        bandwidth: Bandwidth::Khz125,
        spreading_factor: 11,
        coding_rate: CodingRate::Cr4_5,
    }
}

#[test]
fn test_request_echoes_payload_end_to_end() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);

    let (source, payload) = session
        .request(49, CMD_LORA_PARAMETER, &[0x01, 20, 0, 11, 1])
        .expect("transaction should succeed");

    assert_eq!(source, 49);
    assert_eq!(payload, vec![0x01, 20, 0, 11, 1]);
}

#[test]
fn test_local_read_caches_identity() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);

    assert_eq!(session.identity(), None);

    let identity = session.local_read().expect("local read should succeed");
    assert_eq!(identity.address, 49);
    assert_eq!(identity.network, 121);
    assert_eq!(identity.unique_id, 0xDEADBEEF);
    assert_eq!(session.identity(), Some(identity));
}

#[test]
fn test_connect_is_bounded_on_silence() {
    let mut module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    module.faults.silent = true;
    let mut session = session_with(module);

    let err = session.connect(3).expect_err("silent module cannot connect");
    assert!(matches!(err, LinkError::Timeout { .. }));

    // One local-read request per attempt, no more.
    assert_eq!(session.into_transport().requests().len(), 3);
}

#[test]
fn test_silent_module_times_out() {
    let mut module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    module.faults.silent = true;
    let mut session = session_with(module);

    let err = session.local_read().expect_err("no response scheduled");
    assert!(matches!(err, LinkError::Timeout { deadline: 5000 }));
}

#[test]
fn test_corrupted_response_is_rejected() {
    let mut module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    module.faults.corrupt_crc = true;
    let mut session = session_with(module);

    let err = session.local_read().expect_err("CRC cannot validate");
    assert!(matches!(
        err,
        LinkError::Protocol(ProtocolError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_mismatched_command_is_not_success() {
    let mut module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    module.faults.command_override = Some(0xD4);
    let mut session = session_with(module);

    let err = session.local_read().expect_err("wrong command must fail");
    assert!(matches!(
        err,
        LinkError::UnexpectedResponse {
            sent: 0xE2,
            received: 0xD4
        }
    ));
}

#[test]
fn test_stale_input_is_discarded_before_waiting() {
    let mut module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    module.preload_stale(&[0x99, 0x42, 0x17]);
    let mut session = session_with(module);

    let identity = session
        .local_read()
        .expect("stale bytes must not poison the transaction");
    assert_eq!(identity.address, 49);
}

#[test]
fn test_config_radio_verifies_echo() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);

    session
        .config_radio(49, radio_params())
        .expect("module echoes what was requested");
}

#[test]
fn test_config_radio_detects_parameter_drift() {
    let mut module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    module.faults.drift_radio_params = true;
    let mut session = session_with(module);

    let err = session
        .config_radio(49, radio_params())
        .expect_err("drifted echo must surface");
    match err {
        LinkError::ParameterMismatch { requested, echoed } => {
            assert_eq!(requested, [20, 0, 11, 1]);
            assert_eq!(echoed, [20, 0, 12, 1]);
        }
        other => panic!("expected ParameterMismatch, got {other:?}"),
    }
}

#[test]
fn test_config_radio_rejects_bad_spreading_factor() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);

    let mut params = radio_params();
    params.spreading_factor = 6;
    let err = session.config_radio(49, params).expect_err("SF below 7");
    assert!(matches!(
        err,
        LinkError::Protocol(ProtocolError::InvalidRadioParams(_))
    ));
}

#[test]
fn test_store_address_updates_identity() {
    let module = SimulatedModule::new(1, 121, 0xDEADBEEF);
    let mut session = session_with(module);
    session.local_read().unwrap();

    session
        .store_address(49, 121, 0xDEADBEEF)
        .expect("store should succeed");

    let identity = session.identity().unwrap();
    assert_eq!(identity.address, 49);
    assert_eq!(identity.network, 121);
}

#[test]
fn test_store_network_updates_identity() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);
    session.local_read().unwrap();

    session.store_network(200).expect("store should succeed");
    assert_eq!(session.identity().unwrap().network, 200);
}

#[test]
fn test_set_low_power_round_trip() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);

    session
        .set_low_power(49, PowerClass::A, RxWindow::Seconds10)
        .expect("class change should be acknowledged");

    let requests = session.into_transport();
    let (address, command, payload) = &requests.requests()[0];
    assert_eq!(*address, 49);
    assert_eq!(*command, 0xC1);
    assert_eq!(payload.as_slice(), &[0x00, 0x00, 0x01, 0x00]);
}

#[test]
fn test_send_transparent_returns_payload() {
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);

    let reply = session
        .send_transparent(7, b"hello mesh")
        .expect("send should succeed");
    assert_eq!(reply, b"hello mesh");
}

#[test]
fn test_address_bound_follows_revision() {
    // 10-bit revision rejects 2047 before any I/O happens.
    let module = SimulatedModule::new(49, 121, 0xDEADBEEF);
    let mut session = session_with(module);
    let err = session
        .request(2047, CMD_LORA_PARAMETER, &[])
        .expect_err("out of 10-bit range");
    assert!(matches!(
        err,
        LinkError::Protocol(ProtocolError::AddressOutOfRange {
            address: 2047,
            max: 1023
        })
    ));
    assert!(
        session.into_transport().requests().is_empty(),
        "nothing must reach the transport"
    );

    // 11-bit revision accepts the same address.
    let revision = Revision {
        address_width: AddressWidth::Bits11,
        ..Revision::default()
    };
    let module = SimulatedModule::with_revision(49, 121, 0xDEADBEEF, revision);
    let mut config = SessionConfig::fast();
    config.revision = revision;
    let mut session = LinkSession::new(module, config);

    session
        .request(2047, CMD_LORA_PARAMETER, &[0x01, 20, 0, 11, 1])
        .expect("broadcast address is valid at 11 bits");
}
