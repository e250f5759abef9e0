use super::*;
use crate::{
    config::TrackerSettings,
    model::member::Classification,
    service::scanner::{classify, InactivityScanner, MemberStanding},
};

fn standing(days_inactive: i64) -> MemberStanding {
    MemberStanding {
        days_inactive,
        demoted: false,
        under_review: false,
    }
}

/// Tests each classification rule.
///
/// Expected: ghost, demotion and review candidates flagged at their thresholds
#[test]
fn classifies_members() {
    let config = test_config();
    let settings = TrackerSettings::default();
    let roles = &config.roles;

    let ghost = member(1, &[]);
    assert_eq!(classify(&ghost, standing(15), roles, &settings), Classification::Ghost);
    assert_eq!(classify(&ghost, standing(14), roles, &settings), Classification::Fine);

    let privileged = member(2, &[PRIVILEGED_ROLE]);
    assert_eq!(
        classify(&privileged, standing(16), roles, &settings),
        Classification::DemotionCandidate
    );
    assert_eq!(classify(&privileged, standing(3), roles, &settings), Classification::Fine);

    let demoted = member(3, &[INACTIVE_ROLE]);
    let demoted_standing = |days, under_review| MemberStanding {
        days_inactive: days,
        demoted: true,
        under_review,
    };
    assert_eq!(
        classify(&demoted, demoted_standing(30, false), roles, &settings),
        Classification::ReviewCandidate
    );
    assert_eq!(
        classify(&demoted, demoted_standing(30, true), roles, &settings),
        Classification::Fine
    );
    assert_eq!(
        classify(&demoted, demoted_standing(20, false), roles, &settings),
        Classification::Fine
    );

    let other = member(4, &[12345]);
    assert_eq!(classify(&other, standing(100), roles, &settings), Classification::Fine);

    let mut bot = member(5, &[]);
    bot.is_bot = true;
    assert_eq!(classify(&bot, standing(100), roles, &settings), Classification::Fine);
}

/// Tests that a privileged member already in the demoted set is not flagged for demotion.
///
/// Expected: Fine below the review threshold
#[test]
fn demoted_privileged_member_not_redemoted() {
    let config = test_config();
    let settings = TrackerSettings::default();
    let member = member(1, &[PRIVILEGED_ROLE]);

    let result = classify(
        &member,
        MemberStanding {
            days_inactive: 20,
            demoted: true,
            under_review: false,
        },
        &config.roles,
        &settings,
    );

    assert_eq!(result, Classification::Fine);
}

/// Tests a privileged member kept under review after a demotion vote.
///
/// Expected: Fine below the review threshold, review candidate from it on
#[test]
fn reviewed_privileged_member_becomes_review_candidate() {
    let config = test_config();
    let settings = TrackerSettings::default();
    let member = member(1, &[PRIVILEGED_ROLE]);
    let reviewed = |days| MemberStanding {
        days_inactive: days,
        demoted: false,
        under_review: true,
    };

    assert_eq!(
        classify(&member, reviewed(20), &config.roles, &settings),
        Classification::Fine
    );
    assert_eq!(
        classify(&member, reviewed(30), &config.roles, &settings),
        Classification::ReviewCandidate
    );
}

/// Tests the ghost scenario sweep.
///
/// Expected: one quorum-1 ghost session opened, second sweep skips it
#[tokio::test]
async fn sweep_opens_sessions_once() {
    let (_test, tracker, config) = setup().await;
    seed_activity(&tracker, 1, 20).await;
    seed_activity(&tracker, 2, 16).await;
    seed_activity(&tracker, 3, 1).await;
    let members = vec![
        member(1, &[]),
        member(2, &[PRIVILEGED_ROLE]),
        member(3, &[PRIVILEGED_ROLE]),
    ];
    let scanner = InactivityScanner::new(&tracker, &config.roles, &config.tracker);

    let report = scanner.sweep(&members, Utc::now()).await;

    assert_eq!(report.scanned, 3);
    assert_eq!(report.flagged, 2);
    assert_eq!(report.opened.len(), 2);
    let ghost = report
        .opened
        .iter()
        .find(|s| s.kind == SessionKind::Ghost)
        .unwrap();
    assert_eq!(ghost.target_user_id, 1);
    assert_eq!(ghost.quorum, 1);
    let demotion = report
        .opened
        .iter()
        .find(|s| s.kind == SessionKind::Demotion)
        .unwrap();
    assert_eq!(demotion.quorum, 2);

    let again = scanner.sweep(&members, Utc::now()).await;
    assert!(again.opened.is_empty());
    assert_eq!(again.already_open, 2);
}

/// Tests members the ledger never saw.
///
/// Expected: measured from join date, so recent recruits are not ghosts
#[tokio::test]
async fn unseen_members_measured_from_join() {
    let (_test, tracker, config) = setup().await;
    let mut recruit = member(1, &[]);
    recruit.joined_at = Some(Utc::now() - Duration::days(2));
    let mut old_timer = member(2, &[]);
    old_timer.joined_at = Some(Utc::now() - Duration::days(200));
    let scanner = InactivityScanner::new(&tracker, &config.roles, &config.tracker);

    let report = scanner.sweep(&[recruit, old_timer], Utc::now()).await;

    assert_eq!(report.opened.len(), 1);
    assert_eq!(report.opened[0].target_user_id, 2);
}

/// Tests that bots are skipped entirely.
///
/// Expected: not counted as scanned
#[tokio::test]
async fn skips_bots() {
    let (_test, tracker, config) = setup().await;
    let mut bot = member(1, &[]);
    bot.is_bot = true;
    let scanner = InactivityScanner::new(&tracker, &config.roles, &config.tracker);

    let report = scanner.sweep(&[bot], Utc::now()).await;

    assert_eq!(report.scanned, 0);
    assert!(report.opened.is_empty());
}

/// Tests that a long-inactive demoted member is marked inactive again.
///
/// Expected: status flips from active to inactive
#[tokio::test]
async fn rearms_return_detection_for_demoted_members() {
    let (_test, tracker, config) = setup().await;
    seed_activity(&tracker, 1, 16).await;
    tracker.ledger.mark_demoted(1).await;
    let scanner = InactivityScanner::new(&tracker, &config.roles, &config.tracker);

    scanner
        .sweep(&[member(1, &[INACTIVE_ROLE])], Utc::now())
        .await;

    assert_eq!(
        tracker.ledger.get(1).await.unwrap().status,
        ActivityStatus::Inactive
    );
}
