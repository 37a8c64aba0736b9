#[cfg(test)]
mod tests {
    use crate::battle::events::{BattleEvent, BattleOutcome, ItemFailureReason};
    use crate::battle::rng::ScriptedRng;
    use crate::battle::session::{BattleSession, BattleState, ItemTarget};
    use crate::battle::tests::common::{create_test_player, test_catalog, TestMonsterBuilder};
    use crate::config::BattleConfig;
    use crate::encounter::EncounterKind;
    use crate::errors::ActionError;
    use crate::monster::Monster;
    use crate::player::Player;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn player_with_bag(hp: u32, bag: &[&str]) -> Player {
        let mut player = create_test_player(vec![
            TestMonsterBuilder::new("Pip", [100, 10, 10, 10]).with_hp(hp).build(),
            TestMonsterBuilder::new("Rex", [80, 10, 10, 10]).with_hp(10).build(),
        ]);
        player.inventory.capacity = 5;
        for item in bag {
            player.inventory.add(*item);
        }
        player
    }

    fn enemy() -> Monster {
        TestMonsterBuilder::new("Gnar", [100, 10, 10, 10]).build()
    }

    #[test]
    fn test_bag_heal_does_not_consume_the_round() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(50, &["Berry"]);
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        session.take_events();
        let events = session.choose_item("Berry", ItemTarget::Teammate(0)).unwrap();

        assert_eq!(
            events,
            vec![
                BattleEvent::ItemUsed {
                    item: "Berry".to_string(),
                    target: Some("Pip".to_string()),
                },
                BattleEvent::HealApplied {
                    target: "Pip".to_string(),
                    amount: 20,
                    new_hp: 70,
                },
            ]
        );
        assert_eq!(session.round(), 0);
        assert_eq!(session.state(), &BattleState::Ongoing);
        assert!(session.player().inventory.is_empty());
    }

    #[test]
    fn test_bag_heal_can_target_a_benched_teammate() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(100, &["Super Berry"]);
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        session.choose_item("Super Berry", ItemTarget::Teammate(1)).unwrap();

        assert_eq!(session.player().team[1].current_hp(), 50);
    }

    #[test]
    fn test_heal_at_full_hp_keeps_the_item() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(100, &["Berry"]);
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        let events = session.choose_item("Berry", ItemTarget::Teammate(0)).unwrap();

        assert!(events.contains(&BattleEvent::ItemFailed {
            item: "Berry".to_string(),
            reason: ItemFailureReason::AlreadyFullHp,
        }));
        assert!(session.player().inventory.contains("Berry"));
    }

    #[test]
    fn test_full_heal_percent_may_exceed_max_hp() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(30, &["Vital Tonic"]);
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        session.choose_item("Vital Tonic", ItemTarget::Teammate(0)).unwrap();

        assert_eq!(session.player().team[0].current_hp(), 120);
    }

    #[test]
    fn test_capacity_item_only_grows_the_bag() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(100, &["Big Bag", "Big Bag"]);
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        let events = session.choose_item("Big Bag", ItemTarget::Enemy).unwrap();
        assert!(events.contains(&BattleEvent::BagExpanded { capacity: 6 }));

        let events = session.choose_item("Big Bag", ItemTarget::Enemy).unwrap();
        assert!(events.contains(&BattleEvent::ItemFailed {
            item: "Big Bag".to_string(),
            reason: ItemFailureReason::CapacityNotIncreased {
                capacity: 6,
                offered: 6
            },
        }));
        assert_eq!(session.player().inventory.items, vec!["Big Bag".to_string()]);
    }

    #[rstest]
    #[case::normal(99, 85)]
    #[case::critical(0, 70)]
    fn test_damage_item(#[case] crit_roll: u32, #[case] remaining: u32) {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(100, &["Pebble Bomb"]);
        let mut rng = ScriptedRng::new(vec![crit_roll]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        session.choose_item("Pebble Bomb", ItemTarget::Enemy).unwrap();

        assert_eq!(session.enemy().current_hp(), remaining);
        assert!(session.player().inventory.is_empty());
    }

    #[test]
    fn test_escape_item_ends_wild_battle() {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(100, &["Smoke Bomb"]);
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        session.choose_item("Smoke Bomb", ItemTarget::Enemy).unwrap();

        assert_eq!(session.outcome(), Some(BattleOutcome::Fled));
        assert_eq!(session.choose_attack(0), Err(ActionError::BattleOver));
        let report = session.finish().unwrap();
        assert_eq!(report.outcome, BattleOutcome::Fled);
        assert_eq!(report.rewards, None);
        assert!(player.inventory.is_empty());
    }

    #[rstest]
    #[case::not_in_bag("Smoke Bomb", ItemTarget::Enemy, ActionError::ItemNotInBag("Smoke Bomb".to_string()))]
    #[case::not_usable("Shiny Rock", ItemTarget::Enemy, ActionError::ItemNotUsable("Shiny Rock".to_string()))]
    #[case::passive("XP Share", ItemTarget::Teammate(0), ActionError::ItemNotUsable("XP Share".to_string()))]
    #[case::wrong_side("Berry", ItemTarget::Enemy, ActionError::MissingTarget("Berry".to_string()))]
    #[case::bad_index("Berry", ItemTarget::Teammate(4), ActionError::InvalidTeamIndex(4))]
    fn test_rejected_item_use(#[case] item: &str, #[case] target: ItemTarget, #[case] expected: ActionError) {
        let catalog = test_catalog();
        let config = BattleConfig::default();
        let mut player = player_with_bag(50, &["Berry", "Shiny Rock", "XP Share"]);
        let before = player.clone();
        let mut rng = ScriptedRng::new(vec![]);

        let mut session =
            BattleSession::start(&catalog, &config, &mut player, enemy(), EncounterKind::Wild, &mut rng).unwrap();
        session.take_events();
        assert_eq!(session.choose_item(item, target), Err(expected));
        assert!(session.take_events().is_empty());
        drop(session);

        assert_eq!(player, before);
    }
}
