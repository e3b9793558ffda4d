//! Drives a `PowerSwitch` through its public API against the fake switch.

use dli_power_sdk_rs::fake_pdu::FakePdu;
use dli_power_sdk_rs::{
    format_status_table, Authentication, DliPowerError, Outlet, OutletState, PowerSwitch, SwitchConfig,
    SwitchDefaults,
};

fn switch_for(pdu: &FakePdu) -> PowerSwitch {
    let config = SwitchConfig {
        hostname: Some(pdu.address()),
        userid: Some("admin".to_string()),
        password: Some("1234".to_string()),
        timeout: Some(5),
        cycletime: Some(0.0),
    };
    PowerSwitch::with_defaults(config, &SwitchDefaults::empty()).unwrap()
}

#[tokio::test]
async fn full_session_against_challenge_switch() {
    let pdu = FakePdu::start("admin", "1234", &[("web", true), ("db", false), ("spare", false)]).await;
    let mut switch = switch_for(&pdu);

    assert_eq!(switch.login().await.unwrap(), Authentication::Session);

    let outlets = switch.statuslist().await.unwrap();
    assert_eq!(
        outlets,
        vec![
            Outlet { number: 1, name: "web".to_string(), state: OutletState::On },
            Outlet { number: 2, name: "db".to_string(), state: OutletState::Off },
            Outlet { number: 3, name: "spare".to_string(), state: OutletState::Off },
        ]
    );

    switch.on(2).await.unwrap();
    switch.off(1).await.unwrap();
    switch.cycle(3).await.unwrap();
    assert_eq!(
        pdu.commands(),
        vec!["/outlet?2=ON", "/outlet?1=OFF", "/outlet?3=OFF", "/outlet?3=ON"]
    );

    let outlets = switch.statuslist().await.unwrap();
    let table = format_status_table(&outlets);
    assert_eq!(
        table,
        "Outlet\tName           \tState\n\
         1\tweb            \tOFF\n\
         2\tdb             \tON\n\
         3\tspare          \tON\n"
    );
    switch.print_status().await.unwrap();
    assert_eq!(pdu.logins(), 1);
}

#[tokio::test]
async fn full_session_against_basic_auth_switch() {
    let pdu = FakePdu::start_basic("admin", "1234", &[("web", false)]).await;
    let mut switch = switch_for(&pdu);

    switch.on(1).await.unwrap();
    assert_eq!(switch.authentication(), Some(Authentication::Basic));
    assert_eq!(switch.status(1).await.unwrap(), OutletState::On);
    assert_eq!(switch.determine_outlet("WEB").await.unwrap(), 1);
}

#[tokio::test]
async fn rejected_login_surfaces_as_error() {
    let pdu = FakePdu::start("admin", "letmein", &[("web", true)]).await;
    let mut switch = switch_for(&pdu);

    assert!(matches!(switch.login().await, Err(DliPowerError::LoginFailed(_))));
    assert!(matches!(switch.statuslist().await, Err(DliPowerError::LoginFailed(_))));
}
