#[cfg(test)]
mod tests {
    use crate::battle::events::{BattleEvent, BattleOutcome};
    use crate::battle::rng::ScriptedRng;
    use crate::battle::session::BattleSession;
    use crate::battle::tests::common::{count_events, create_test_player, test_catalog, TestMonsterBuilder};
    use crate::config::BattleConfig;
    use crate::encounter::EncounterKind;
    use crate::monster::Monster;
    use pretty_assertions::assert_eq;

    /// Rolls for a round where both sides miss with Tackle: player hit and phrasing, enemy pick, hit and phrasing.
    const BOTH_MISS: [u32; 5] = [99, 0, 0, 99, 0];

    fn pip(hp: u32, item: &str) -> Monster {
        TestMonsterBuilder::new("Pip", [100, 10, 10, 10])
            .holding(item)
            .with_hp(hp)
            .build()
    }

    fn slow_enemy() -> Monster {
        TestMonsterBuilder::new("Gnar", [500, 10, 10, 1]).build()
    }

    #[test]
    fn test_recurring_heal_fires_without_struggling() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![pip(90, "Whistle-hoo")]);
        let mut rng = ScriptedRng::new(BOTH_MISS.to_vec());

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, slow_enemy(), EncounterKind::Wild, &mut rng)
                .unwrap();
        let events = session.choose_attack(0).unwrap();

        assert!(events.contains(&BattleEvent::HealApplied {
            target: "Pip".to_string(),
            amount: 10,
            new_hp: 100,
        }));
        assert_eq!(count_events(&events, |e| matches!(e, BattleEvent::HeldItemTriggered { .. })), 0);
        // Recurring items are never consumed
        assert_eq!(session.player().team[0].held_item.as_deref(), Some("Whistle-hoo"));
    }

    #[test]
    fn test_struggling_holder_uses_and_loses_its_item() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![pip(20, "Berry")]);
        let mut rng = ScriptedRng::new(BOTH_MISS.to_vec());

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, slow_enemy(), EncounterKind::Wild, &mut rng)
                .unwrap();
        session.take_events();
        let events = session.choose_attack(0).unwrap();

        let tail = &events[events.len() - 3..];
        assert_eq!(
            tail,
            &[
                BattleEvent::HeldItemTriggered {
                    holder: "Pip".to_string(),
                    item: "Berry".to_string(),
                },
                BattleEvent::ItemUsed {
                    item: "Berry".to_string(),
                    target: Some("Pip".to_string()),
                },
                BattleEvent::HealApplied {
                    target: "Pip".to_string(),
                    amount: 20,
                    new_hp: 40,
                },
            ]
        );
        assert_eq!(session.player().team[0].held_item, None);
        assert!(session.player().inventory.is_empty());
    }

    #[test]
    fn test_healthy_holder_keeps_its_item() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![pip(26, "Berry")]);
        let mut rng = ScriptedRng::new(BOTH_MISS.to_vec());

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, slow_enemy(), EncounterKind::Wild, &mut rng)
                .unwrap();
        session.choose_attack(0).unwrap();

        assert_eq!(session.player().team[0].current_hp(), 26);
        assert_eq!(session.player().team[0].held_item.as_deref(), Some("Berry"));
    }

    #[test]
    fn test_held_damage_item_hits_the_opponent() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![pip(20, "Pebble Bomb")]);
        let mut rolls = BOTH_MISS.to_vec();
        rolls.push(99); // no item crit
        let mut rng = ScriptedRng::new(rolls);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, slow_enemy(), EncounterKind::Wild, &mut rng)
                .unwrap();
        session.choose_attack(0).unwrap();

        assert_eq!(session.enemy().current_hp(), 485);
        assert_eq!(session.player().team[0].held_item, None);
    }

    #[test]
    fn test_struggling_enemy_escapes_with_smoke_bomb() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![TestMonsterBuilder::new("Pip", [100, 10, 10, 10]).build()]);
        let enemy = TestMonsterBuilder::new("Gnar", [100, 10, 10, 1])
            .holding("Smoke Bomb")
            .with_hp(10)
            .build();
        let mut rng = ScriptedRng::new(BOTH_MISS.to_vec());

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy, EncounterKind::Wild, &mut rng).unwrap();
        let events = session.choose_attack(0).unwrap();

        assert!(events.contains(&BattleEvent::EscapeSucceeded));
        assert_eq!(session.outcome(), Some(BattleOutcome::Fled));
    }

    #[test]
    fn test_items_without_hold_effect_never_trigger() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![pip(5, "XP Share")]);
        let mut rng = ScriptedRng::new(BOTH_MISS.to_vec());

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, slow_enemy(), EncounterKind::Wild, &mut rng)
                .unwrap();
        let events = session.choose_attack(0).unwrap();

        assert_eq!(count_events(&events, |e| matches!(e, BattleEvent::HeldItemTriggered { .. })), 0);
        assert_eq!(session.player().team[0].held_item.as_deref(), Some("XP Share"));
    }
}
