#[cfg(test)]
mod tests {
    use crate::battle::events::{BattleEvent, MissPhrasing};
    use crate::battle::rng::ScriptedRng;
    use crate::battle::session::{BattleSession, PlayerDecision};
    use crate::battle::tests::common::{create_test_player, test_catalog, TestMonsterBuilder};
    use crate::config::BattleConfig;
    use crate::encounter::EncounterKind;
    use crate::errors::ActionError;
    use pretty_assertions::assert_eq;
    use schema::StatType;

    #[test]
    fn test_switch_resets_outgoing_and_gives_enemy_a_turn() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut pip = TestMonsterBuilder::new("Pip", [100, 10, 10, 10]).with_hp(60).build();
        pip.adjust_stat(StatType::Attack, 5);
        let rex = TestMonsterBuilder::new("Rex", [100, 10, 10, 10]).build();
        let mut player = create_test_player(vec![pip, rex]);
        let enemy = TestMonsterBuilder::new("Gnar", [100, 20, 10, 10]).build();
        // Enemy pick, miss, phrasing
        let mut rng = ScriptedRng::new(vec![0, 99, 0]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy, EncounterKind::Wild, &mut rng).unwrap();
        session.take_events();
        let events = session.submit(PlayerDecision::Switch(1)).unwrap();

        assert_eq!(
            events,
            vec![
                BattleEvent::MonsterSwitched {
                    old_monster: "Pip".to_string(),
                    new_monster: "Rex".to_string(),
                },
                BattleEvent::AttackUsed {
                    attacker: "Gnar".to_string(),
                    attack: "Tackle".to_string(),
                },
                BattleEvent::AttackMissed {
                    attacker: "Gnar".to_string(),
                    defender: "Rex".to_string(),
                    phrasing: MissPhrasing::AttackerMissed,
                },
            ]
        );
        drop(session);

        assert_eq!(player.team[0].name, "Rex");
        // Battle stats reset, HP kept
        assert_eq!(player.team[1].current_stats, [60, 10, 10, 10]);
    }

    #[test]
    fn test_invalid_switches_are_rejected() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![
            TestMonsterBuilder::new("Pip", [100, 10, 10, 10]).build(),
            TestMonsterBuilder::new("Rex", [100, 10, 10, 10]).build(),
        ]);
        let enemy = TestMonsterBuilder::new("Gnar", [100, 20, 10, 10]).build();
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy, EncounterKind::Wild, &mut rng).unwrap();
        assert_eq!(session.switch_monster(0), Err(ActionError::ActiveMonsterSelected));
        assert_eq!(session.switch_monster(2), Err(ActionError::InvalidTeamIndex(2)));
        assert_eq!(session.player().team[0].name, "Pip");
    }

    #[test]
    fn test_switch_needs_a_teammate() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![TestMonsterBuilder::new("Pip", [100, 10, 10, 10]).build()]);
        let enemy = TestMonsterBuilder::new("Gnar", [100, 20, 10, 10]).build();
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy, EncounterKind::Wild, &mut rng).unwrap();
        assert_eq!(session.switch_monster(1), Err(ActionError::NoOtherMonsters));
    }

    #[test]
    fn test_invalid_attack_index_leaves_session_untouched() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = create_test_player(vec![TestMonsterBuilder::new("Pip", [100, 10, 10, 10]).build()]);
        let enemy = TestMonsterBuilder::new("Gnar", [100, 20, 10, 10]).build();
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy, EncounterKind::Wild, &mut rng).unwrap();
        assert_eq!(session.choose_attack(1), Err(ActionError::InvalidAttackIndex(1)));
        assert_eq!(session.round(), 0);
        assert_eq!(session.take_events().len(), 1, "only the start announcement");
    }
}
