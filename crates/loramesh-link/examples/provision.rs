//! Provisioning walkthrough against the simulated module.
//!
//! Mirrors a typical bench session with a factory-fresh module: read its
//! identity, move it to a network, assign an address, set the radio
//! parameters and put it in a low-power class.
//!
//! Run with `RUST_LOG=debug` to watch the individual transactions.

use loramesh_link::sim::SimulatedModule;
use loramesh_link::{LinkSession, SessionConfig};
use loramesh_protocol::{Bandwidth, CodingRate, PowerClass, RadioParams, RxWindow};

fn main() {
    env_logger::init();

    let module = SimulatedModule::new(1, 0, 0x00C0FFEE);
    let mut session = LinkSession::new(module, SessionConfig::fast());

    let identity = session.connect(5).expect("module did not answer");
    println!(
        "found module: address={} network={} unique_id=0x{:08X}",
        identity.address, identity.network, identity.unique_id
    );

    session.store_network(121).expect("store network failed");
    session
        .store_address(49, 121, identity.unique_id)
        .expect("store address failed");

    let params = RadioParams {
        power: 20,
        bandwidth: Bandwidth::Khz125,
        spreading_factor: 11,
        coding_rate: CodingRate::Cr4_5,
    };
    session.config_radio(49, params).expect("radio config failed");
    session
        .set_low_power(49, PowerClass::C, RxWindow::Seconds5)
        .expect("class change failed");

    let identity = session.identity().expect("identity cached");
    println!(
        "provisioned: address={} network={} unique_id=0x{:08X}",
        identity.address, identity.network, identity.unique_id
    );
}
