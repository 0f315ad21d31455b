//! Slot-identifier vocabulary tests: id builders, role predicates and
//! driven-shift weights.

use roster_core::slots;

#[test]
fn slot_builders_produce_reserved_ids() {
    assert_eq!(slots::rtw_slot(1, false, 1), "rtw1_tag_1");
    assert_eq!(slots::rtw_slot(2, true, 2), "rtw2_nacht_2");
    assert_eq!(slots::nef_slot(1), "nef1_1");
    assert!(slots::is_reserved_slot(&slots::rtw_slot(1, false, 1)));
    assert!(slots::is_reserved_slot(slots::ITW_PHYSICIAN_SLOT));
    assert!(!slots::is_reserved_slot("note"));
    assert!(!slots::is_reserved_slot(""));
}

#[test]
fn machinist_predicate_only_matches_position_two() {
    assert!(slots::is_rtw_machinist_slot("rtw1_tag_2"));
    assert!(slots::is_rtw_machinist_slot("rtw3_nacht_2"));
    assert!(!slots::is_rtw_machinist_slot("rtw1_tag_1"));
    assert!(!slots::is_rtw_machinist_slot(slots::ITW_MACHINIST_SLOT));
}

#[test]
fn driven_weights_per_role() {
    assert_eq!(slots::driven_weight("rtw1_tag_1"), 1);
    assert_eq!(slots::driven_weight("rtw1_nacht_2"), 1);
    assert_eq!(slots::driven_weight(slots::ITW_COMMANDER_SLOT), 1);
    assert_eq!(slots::driven_weight(slots::ITW_MACHINIST_SLOT), 1);
    assert_eq!(slots::driven_weight("nef1_1"), 2);
    assert_eq!(slots::driven_weight(slots::ITW_PHYSICIAN_SLOT), 0);
    assert_eq!(slots::driven_weight(""), 0);
    assert_eq!(slots::driven_weight("note"), 0);
}
