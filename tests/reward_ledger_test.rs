mod common;

use chrono::Utc;
use tokio_test::block_on;

use ahorro_core::challenges::{ChallengeRepositoryTrait, ChallengeServiceTrait};
use ahorro_core::errors::Error;
use ahorro_core::goals::{boost, GoalServiceTrait, NewSavingsGoal, SavingsGoal};
use ahorro_core::rewards::{
    tier_for_draw, RewardError, RewardRepositoryTrait, RewardServiceTrait, RewardType,
};

const USER: &str = "user-1";

fn complete_current_week(app: &common::TestApp) -> String {
    let snapshot = block_on(app.challenges.update_progress(USER, 250.0)).unwrap();
    assert!(snapshot.is_completed);
    snapshot.id
}

fn create_goal(app: &common::TestApp, saved_amount: f64) -> SavingsGoal {
    block_on(app.goals.create_goal(NewSavingsGoal {
        id: None,
        user_id: USER.to_string(),
        title: "Vacaciones".to_string(),
        target_amount: 5000.0,
        saved_amount,
    }))
    .unwrap()
}

#[test]
fn retry_chance_is_never_persisted_and_keeps_the_challenge_claimable() {
    let app = common::setup();
    let challenge_id = complete_current_week(&app);

    app.draws.push(0.65);
    let retry = block_on(app.rewards.claim(USER, &challenge_id)).unwrap();
    assert_eq!(retry.kind(), RewardType::RetryChance);
    assert_eq!(retry.description, "Tira otra vez");

    // No ledger entry, no claim flag: the caller may roll again right away.
    assert!(app.reward_repo.load_rewards(USER).unwrap().is_empty());
    let challenge = app.challenge_repo.get_by_id(&challenge_id).unwrap().unwrap();
    assert!(!challenge.is_reward_claimed);

    app.draws.push(0.05);
    let reward = block_on(app.rewards.claim(USER, &challenge_id)).unwrap();
    assert_eq!(reward.kind(), RewardType::AprBoost);
}

#[test]
fn empty_handed_draws_are_persisted_but_hidden_from_the_reward_list() {
    let app = common::setup();
    let challenge_id = complete_current_week(&app);

    app.draws.push(0.85);
    let nothing = block_on(app.rewards.claim(USER, &challenge_id)).unwrap();
    assert_eq!(nothing.kind(), RewardType::None);
    assert_eq!(nothing.description, "¡Sigue intentando!");

    // The draw still consumed the weekly claim.
    let challenge = app.challenge_repo.get_by_id(&challenge_id).unwrap().unwrap();
    assert!(challenge.is_reward_claimed);

    // Stored in the ledger, filtered from every user-facing list.
    assert_eq!(app.reward_repo.load_rewards(USER).unwrap().len(), 1);
    assert!(app.rewards.get_rewards(USER).unwrap().is_empty());
    let rx = app.rewards.observe_rewards(USER).unwrap();
    assert!(rx.borrow().is_empty());
}

#[test]
fn observers_see_claimed_rewards_including_used_ones() {
    let app = common::setup();
    let challenge_id = complete_current_week(&app);

    let rx = app.rewards.observe_rewards(USER).unwrap();
    assert!(rx.borrow().is_empty());

    app.draws.push(0.05);
    let reward = block_on(app.rewards.claim(USER, &challenge_id)).unwrap();
    assert_eq!(rx.borrow().len(), 1);

    // Used rewards stay visible for history.
    block_on(app.rewards.apply_to_goal(USER, &reward.id, None)).unwrap();
    let visible = rx.borrow();
    assert_eq!(visible.len(), 1);
    assert!(visible[0].is_used);
}

#[test]
fn applying_a_boost_freezes_the_profit_snapshot() {
    let app = common::setup();
    let challenge_id = complete_current_week(&app);
    let goal = create_goal(&app, 1000.0);

    app.draws.push(0.05);
    let reward = block_on(app.rewards.claim(USER, &challenge_id)).unwrap();

    let preview = app.rewards.preview_boost(USER, &reward.id, &goal.id).unwrap();
    let projection = block_on(app.rewards.apply_to_goal(USER, &reward.id, Some(goal.id.as_str())))
        .unwrap()
        .expect("APR boost must yield a projection");

    // Preview and applied snapshot come from the same arithmetic and the
    // same principal read.
    assert_eq!(preview, projection);
    // 1000 * 20/36500 * 7
    assert_eq!(projection.profit.round_dp(4), rust_decimal_macros::dec!(3.8356));

    let boosted = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    assert_eq!(boosted.active_boost_id.as_deref(), Some(reward.id.as_str()));
    assert_eq!(boosted.active_boost_apr, Some(20.0));
    let frozen_profit = boosted.active_boost_profit.unwrap();
    assert!((frozen_profit - projection.profit_f64()).abs() < 1e-9);
    assert_eq!(
        boosted.boost_expiry(),
        Some(projection.end_date)
    );

    let used = app.reward_repo.get_by_id(USER, &reward.id).unwrap().unwrap();
    assert!(used.is_used);
    assert_eq!(used.applied_to_goal_id.as_deref(), Some(goal.id.as_str()));

    // Later principal changes do not move the frozen snapshot.
    block_on(app.goals.add_saved_amount(USER, &goal.id, 500.0)).unwrap();
    let later = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    assert_eq!(later.saved_amount, 1500.0);
    assert_eq!(later.active_boost_profit, Some(frozen_profit));
}

#[test]
fn a_reward_can_be_applied_at_most_once() {
    let app = common::setup();
    let goal = create_goal(&app, 1000.0);
    let reward = block_on(app.reward_repo.add(&tier_for_draw(0.05).grant(USER))).unwrap();

    block_on(app.rewards.apply_to_goal(USER, &reward.id, Some(goal.id.as_str())))
        .unwrap()
        .expect("first application lands the boost");

    let second = block_on(app.rewards.apply_to_goal(USER, &reward.id, Some(goal.id.as_str())));
    assert!(matches!(
        second,
        Err(Error::Reward(RewardError::AlreadyUsed))
    ));
}

#[test]
fn a_second_boost_is_rejected_while_one_is_active() {
    let app = common::setup();
    let goal = create_goal(&app, 1000.0);

    let first = block_on(app.reward_repo.add(&tier_for_draw(0.05).grant(USER))).unwrap();
    block_on(app.rewards.apply_to_goal(USER, &first.id, Some(goal.id.as_str())))
        .unwrap()
        .expect("first application lands the boost");

    let second = block_on(app.reward_repo.add(&tier_for_draw(0.45).grant(USER))).unwrap();
    let result = block_on(app.rewards.apply_to_goal(USER, &second.id, Some(goal.id.as_str())));
    assert!(matches!(
        result,
        Err(Error::Reward(RewardError::BoostStillActive(_)))
    ));

    // The rejected reward stays unused.
    let untouched = app.reward_repo.get_by_id(USER, &second.id).unwrap().unwrap();
    assert!(!untouched.is_used);
}

// Two applications race on one goal: both read the goal before either
// commits, so both carry a stale "no active boost" view past the service
// check. The storage layer must still reject the loser.
#[test]
fn a_stale_goal_read_cannot_overwrite_an_active_boost() {
    let app = common::setup();
    let goal = create_goal(&app, 1000.0);

    let first = block_on(app.reward_repo.add(&tier_for_draw(0.05).grant(USER))).unwrap();
    let second = block_on(app.reward_repo.add(&tier_for_draw(0.45).grant(USER))).unwrap();

    let stale_goal = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    let today = Utc::now().date_naive();

    block_on(app.rewards.apply_to_goal(USER, &first.id, Some(goal.id.as_str())))
        .unwrap()
        .expect("first application lands the boost");

    // The loser's write arrives with the pre-commit view of the goal.
    let projection =
        boost::project(second.value, second.duration_days, stale_goal.saved_amount, today).unwrap();
    let result = block_on(app.reward_repo.apply_to_goal(
        USER,
        &second.id,
        &stale_goal,
        &projection,
        today,
    ));
    assert!(matches!(
        result,
        Err(Error::Reward(RewardError::BoostStillActive(_)))
    ));

    // The whole transaction rolled back: the loser stays unused and the
    // winner's boost fields are intact.
    let untouched = app.reward_repo.get_by_id(USER, &second.id).unwrap().unwrap();
    assert!(!untouched.is_used);
    assert!(untouched.applied_to_goal_id.is_none());

    let boosted = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    assert_eq!(boosted.active_boost_id.as_deref(), Some(first.id.as_str()));
    assert_eq!(boosted.active_boost_apr, Some(20.0));
}

#[test]
fn an_expired_boost_is_overwritten_by_the_next_application() {
    let app = common::setup();
    let goal = create_goal(&app, 1000.0);

    let first = block_on(app.reward_repo.add(&tier_for_draw(0.05).grant(USER))).unwrap();
    block_on(app.rewards.apply_to_goal(USER, &first.id, Some(goal.id.as_str())))
        .unwrap()
        .expect("first application lands the boost");

    // Age the boost past its expiry.
    let mut aged = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    aged.boost_expiry_date = Some("2020-01-01".to_string());
    block_on(app.goals.update_goal(aged)).unwrap();

    let second = block_on(app.reward_repo.add(&tier_for_draw(0.45).grant(USER))).unwrap();
    block_on(app.rewards.apply_to_goal(USER, &second.id, Some(goal.id.as_str())))
        .unwrap()
        .expect("second application replaces the stale boost");

    let boosted = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    assert_eq!(boosted.active_boost_id.as_deref(), Some(second.id.as_str()));
    assert_eq!(boosted.active_boost_apr, Some(5.0));
}

#[test]
fn marking_an_unknown_reward_reports_not_found() {
    let app = common::setup();

    let result = block_on(app.reward_repo.mark_used(USER, "no-such-reward", None));
    assert!(matches!(
        result,
        Err(Error::Reward(RewardError::NotFound(_)))
    ));
}

#[test]
fn consuming_without_a_goal_marks_the_reward_used() {
    let app = common::setup();
    let reward = block_on(app.reward_repo.add(&tier_for_draw(0.05).grant(USER))).unwrap();

    let outcome = block_on(app.rewards.apply_to_goal(USER, &reward.id, None)).unwrap();
    assert!(outcome.is_none());

    let used = app.reward_repo.get_by_id(USER, &reward.id).unwrap().unwrap();
    assert!(used.is_used);
    assert!(used.applied_to_goal_id.is_none());

    let again = block_on(app.rewards.apply_to_goal(USER, &reward.id, None));
    assert!(matches!(again, Err(Error::Reward(RewardError::AlreadyUsed))));
}

#[test]
fn a_missing_goal_still_consumes_the_reward() {
    let app = common::setup();
    let reward = block_on(app.reward_repo.add(&tier_for_draw(0.05).grant(USER))).unwrap();

    let outcome =
        block_on(app.rewards.apply_to_goal(USER, &reward.id, Some("no-such-goal"))).unwrap();
    assert!(outcome.is_none());

    let used = app.reward_repo.get_by_id(USER, &reward.id).unwrap().unwrap();
    assert!(used.is_used);
    assert_eq!(used.applied_to_goal_id.as_deref(), Some("no-such-goal"));
}

#[test]
fn non_boost_rewards_never_mutate_the_goal() {
    let app = common::setup();
    let goal = create_goal(&app, 1000.0);
    let nothing = block_on(app.reward_repo.add(&tier_for_draw(0.85).grant(USER))).unwrap();

    let outcome =
        block_on(app.rewards.apply_to_goal(USER, &nothing.id, Some(goal.id.as_str()))).unwrap();
    assert!(outcome.is_none());

    let untouched = app.goals.get_goal(USER, &goal.id).unwrap().unwrap();
    assert!(untouched.active_boost_id.is_none());
    assert!(untouched.active_boost_profit.is_none());
}
