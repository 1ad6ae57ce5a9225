//! Full-pipeline scenarios: record in, resolved buffer out

use portmon_core::{nature_of, AlertKind, CanonicalRecord, Nature, PortError};
use portmon_engine::{PortFlags, Porter};
use portmon_formats::{advance, bootstrap, classic};

fn dex() -> portmon_core::MemoryDex {
    bootstrap::dex_from_json(
        r#"{
            "advance": {
                "Mudkip": { "index": 258, "gender_ratio": 1, "ability0": "Torrent", "ability1": "Damp" },
                "move:Tackle": { "index": 33, "pp": 35 },
                "move:Growl": { "index": 45, "pp": 40 },
                "ball:Poke Ball": { "index": 4 },
                "game:Emerald": { "index": 2 }
            },
            "classic": {
                "Mudkip": { "index": 258, "gender_ratio": 1 },
                "move:Tackle": { "index": 33, "pp": 35 }
            }
        }"#,
    )
    .unwrap()
}

fn record() -> CanonicalRecord {
    let mut r = CanonicalRecord::new();
    r.species = Some("Mudkip".into());
    r.nature = Some(Nature::Jolly);
    // nature_of(3) is Adamant, contradicting the stated Jolly
    r.pid = Some(3);
    r.trainer.name = Some("May".into());
    r.trainer.public_id = Some(40122);
    r.trainer.secret_id = Some(11909);
    r.battle.level = Some(20);
    r.moves = vec![portmon_core::MoveRecord {
        name: Some("Tackle".into()),
        ..Default::default()
    }];
    r
}

#[test]
fn test_seed_mismatch_surfaces_one_choice_with_both_candidates() {
    let dex = dex();
    let format = advance::target().unwrap();
    let mut porter = Porter::new(&format, &dex, record(), PortFlags::default()).unwrap();
    porter.seed_rng(11);

    let report = porter.first_pass().unwrap();
    assert_eq!(report.choices.len(), 1);
    let options = &report.choices[0].options;
    assert_eq!(options.len(), 2);
    assert!(options[0].contains("Adamant"));
    assert!(options[1].contains("Jolly"));

    // the second pass refuses to run while the choice is pending
    assert!(matches!(
        porter.second_pass(),
        Err(PortError::UnresolvedChoice(0))
    ));
}

#[test]
fn test_keeping_the_seed_writes_it_verbatim() {
    let dex = dex();
    let format = advance::target().unwrap();
    let mut porter = Porter::new(&format, &dex, record(), PortFlags::default()).unwrap();
    porter.seed_rng(11);

    porter.first_pass().unwrap();
    porter.resolve(&[(0, 0)]).unwrap();
    let report = porter.second_pass().unwrap();
    let bytes = porter.to_bytes().unwrap();

    let pid = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(pid, 3);
    assert!(report.notes.is_empty());
}

#[test]
fn test_regenerating_satisfies_the_stated_nature() {
    let dex = dex();
    let format = advance::target().unwrap();
    let mut porter = Porter::new(&format, &dex, record(), PortFlags::default()).unwrap();
    porter.seed_rng(11);

    porter.first_pass().unwrap();
    porter.resolve(&[(0, 1)]).unwrap();
    let report = porter.second_pass().unwrap();
    let bytes = porter.to_bytes().unwrap();

    let pid = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_ne!(pid, 3);
    assert_eq!(nature_of(pid), Nature::Jolly);
    // the replacement is reported as a second-pass note
    assert!(report.notes.iter().any(|n| n.kind == AlertKind::Casted));
}

#[test]
fn test_override_port_resolves_the_mismatch_silently() {
    let dex = dex();
    let format = advance::target().unwrap();
    let flags = PortFlags {
        apply_stat_override: true,
        ..Default::default()
    };
    let mut porter = Porter::new(&format, &dex, record(), flags).unwrap();
    porter.seed_rng(11);

    let report = porter.first_pass().unwrap();
    assert!(report.choices.is_empty());
    assert!(report.warnings.iter().any(|a| a.kind == AlertKind::Casted));

    porter.second_pass().unwrap();
    let bytes = porter.to_bytes().unwrap();
    let pid = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    assert_eq!(nature_of(pid), Nature::Jolly);
}

#[test]
fn test_phase_misuse_is_rejected() {
    let dex = dex();
    let format = advance::target().unwrap();
    let mut porter = Porter::new(&format, &dex, record(), PortFlags::default()).unwrap();

    // out of order: no first pass yet
    assert!(matches!(porter.second_pass(), Err(PortError::PhaseOrder)));
    assert!(matches!(porter.to_bytes(), Err(PortError::PhaseOrder)));

    porter.first_pass().unwrap();
    assert!(matches!(porter.first_pass(), Err(PortError::PhaseOrder)));
}

#[test]
fn test_same_record_ports_to_both_formats() {
    let dex = dex();
    let mut r = record();
    r.pid = None;
    r.nature = None;

    let classic_format = classic::target().unwrap();
    let mut porter = Porter::new(&classic_format, &dex, r.clone(), PortFlags::default()).unwrap();
    porter.first_pass().unwrap();
    porter.second_pass().unwrap();
    let classic_bytes = porter.to_bytes().unwrap();
    assert_eq!(classic_bytes.len(), classic::SIZE);

    let advance_format = advance::target().unwrap();
    let mut porter = Porter::new(&advance_format, &dex, r, PortFlags::default()).unwrap();
    porter.first_pass().unwrap();
    porter.second_pass().unwrap();
    let advance_bytes = porter.to_bytes().unwrap();
    assert_eq!(advance_bytes.len(), advance::SIZE);

    // species index 258 = 0x0102: advance stores two LE bytes
    assert_eq!(&advance_bytes[8..10], &[0x02, 0x01]);
}
