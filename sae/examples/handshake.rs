use sae::{rand_core::OsRng, Session, State};

fn main() -> sae::Result<()> {
    let sta = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
    let ap = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
    let password = b"correct horse battery staple";

    let mut station = Session::new();
    let mut access_point = Session::new();
    station.set_group(19)?;
    access_point.set_group(19)?;

    station.prepare_commit(&sta, &ap, password, &mut OsRng)?;
    station.set_state(State::Committed);
    access_point.prepare_commit(&ap, &sta, password, &mut OsRng)?;
    access_point.set_state(State::Committed);

    let mut commit = [0u8; 128];
    let len = station.write_commit(None, &mut commit)?;
    println!("station commit: {:02x?}", &commit[..len]);
    access_point.parse_commit(&commit[..len], None)?;

    let len = access_point.write_commit(None, &mut commit)?;
    println!("access point commit: {:02x?}", &commit[..len]);
    station.parse_commit(&commit[..len], None)?;

    station.process_commit()?;
    access_point.process_commit()?;

    let confirm = station.write_confirm()?;
    station.set_state(State::Confirmed);
    access_point.check_confirm(&confirm)?;
    let confirm = access_point.write_confirm()?;
    access_point.set_state(State::Accepted);
    station.check_confirm(&confirm)?;
    station.set_state(State::Accepted);

    if let Some(pmkid) = station.pmkid() {
        println!("pmkid: {:02x?}", pmkid);
    }
    Ok(())
}
