//! End-to-end conversation tests for the chat engine.
//!
//! Drives `ChatOrchestrator` the way a transport would: one inbound event
//! in, one reply out. Each test builds its own orchestrator.

use std::sync::Arc;
use std::thread;

use capify_chat::{ChatError, ChatOrchestrator, Command, Inbound, ReplyMarkup};
use capify_core::config::{CapifyConfig, CategoryConfig, PresenterConfig, TaxonomyConfig};
use capify_core::{ActionToken, FieldKind, Taxonomy, UserId};
use num_bigint::BigInt;

// =============================================================================
// Helpers
// =============================================================================

fn send(orch: &ChatOrchestrator, user: &str, text: &str) -> String {
    orch.dispatch(&Inbound::text(user, text))
        .expect("generic messages always get a reply")
        .text
}

fn track(orch: &ChatOrchestrator, user: &str) -> String {
    orch.dispatch(&Inbound::command(user, Command::Track))
        .unwrap()
        .text
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_full_transaction_conversation() {
    let orch = ChatOrchestrator::default();

    assert_eq!(send(&orch, "1", "15.03.2024"), "Transaction date: 15.03.2024");
    assert_eq!(send(&orch, "1", "-100"), "Transaction amount: -100");
    assert_eq!(send(&orch, "1", "Everyday"), "Transaction category: Everyday");
    assert_eq!(send(&orch, "1", "Food"), "Transaction subcategory: Food");
    assert_eq!(
        send(&orch, "1", "buy groceries"),
        "Transaction description: buy groceries"
    );

    assert_eq!(
        track(&orch, "1"),
        "So, you've decided to track a transaction.\n\
         Here are it's info:\n\
         date = 15.03.2024\n\
         amount = -100\n\
         category = Everyday\n\
         subcategory = Food\n\
         description = buy groceries"
    );
}

#[test]
fn test_track_on_fresh_user_shows_placeholders() {
    let orch = ChatOrchestrator::default();
    assert_eq!(
        track(&orch, "new-user"),
        "So, you've decided to track a transaction.\n\
         Here are it's info:\n\
         date = DD.MM.YYYY\n\
         amount = 0\n\
         category = Cat\n\
         subcategory = Sub\n\
         description = "
    );
}

#[test]
fn test_keyboard_shows_draft_and_actions() {
    let orch = ChatOrchestrator::default();
    send(&orch, "1", "42");
    send(&orch, "1", "Stocks");

    let reply = orch
        .dispatch(&Inbound::command("1", Command::Keyboard))
        .unwrap();
    assert_eq!(
        reply.text,
        "Edit or Confirm transaction's data:\n\
         Date: DD.MM.YYYY\n\
         Amount: 42\n\
         Category: Cat\n\
         Subcategory: Stocks\n\
         Description: "
    );
    match reply.markup {
        ReplyMarkup::InlineKeyboard(rows) => {
            let row: Vec<(&str, &str)> = rows[0]
                .iter()
                .map(|b| (b.label.as_str(), b.token.as_str()))
                .collect();
            assert_eq!(row, vec![("Edit", "1"), ("Confirm", "2")]);
        }
        other => panic!("Expected inline keyboard, got {:?}", other),
    }
}

#[test]
fn test_pressing_buttons_is_inert() {
    let orch = ChatOrchestrator::default();
    send(&orch, "1", "Everyday");
    let before = orch.current_draft(&UserId::new("1"));

    for (token, action) in [("1", ActionToken::Edit), ("2", ActionToken::Confirm)] {
        match orch.dispatch(&Inbound::callback("1", token)) {
            Err(ChatError::ActionNotSupported(got)) => assert_eq!(got, action),
            other => panic!("Expected ActionNotSupported, got {:?}", other),
        }
    }
    assert!(matches!(
        orch.dispatch(&Inbound::callback("1", "3")),
        Err(ChatError::UnknownAction(_))
    ));

    assert_eq!(orch.current_draft(&UserId::new("1")), before);
}

#[test]
fn test_last_write_wins_per_field() {
    let orch = ChatOrchestrator::default();
    send(&orch, "1", "5");
    send(&orch, "1", "Everyday");
    send(&orch, "1", "7");

    let draft = orch.current_draft(&UserId::new("1"));
    assert_eq!(draft.amount, Some(BigInt::from(7)));
    assert_eq!(draft.category.as_deref(), Some("Everyday"));
}

#[test]
fn test_inconsistent_category_and_subcategory_are_kept() {
    let orch = ChatOrchestrator::default();
    send(&orch, "1", "Investments");
    send(&orch, "1", "Restaurant");

    let draft = orch.current_draft(&UserId::new("1"));
    assert_eq!(draft.category.as_deref(), Some("Investments"));
    assert_eq!(draft.subcategory.as_deref(), Some("Restaurant"));
}

#[test]
fn test_malformed_inputs_fall_through_to_description() {
    let orch = ChatOrchestrator::default();
    for text in ["12.5", "12a", "+5", "-", "31.02.2024", "1.3.2024", "everyday"] {
        assert_eq!(
            send(&orch, "1", text),
            format!("Transaction description: {}", text)
        );
    }
    let draft = orch.current_draft(&UserId::new("1"));
    assert!(draft.date.is_none());
    assert!(draft.amount.is_none());
    assert!(draft.category.is_none());
}

#[test]
fn test_users_do_not_share_drafts() {
    let orch = ChatOrchestrator::default();
    send(&orch, "alice", "100");
    send(&orch, "bob", "Food");

    let alice = orch.current_draft(&UserId::new("alice"));
    let bob = orch.current_draft(&UserId::new("bob"));
    assert_eq!(alice.amount, Some(BigInt::from(100)));
    assert!(alice.subcategory.is_none());
    assert_eq!(bob.subcategory.as_deref(), Some("Food"));
    assert!(bob.amount.is_none());
    assert_eq!(orch.sessions().len(), 2);
}

#[test]
fn test_start_greets_with_mention() {
    let orch = ChatOrchestrator::default();
    let reply = orch
        .dispatch(&Inbound::command(7_i64, Command::Start).with_display_name("Ann"))
        .unwrap();
    assert_eq!(reply.text, "Hi <a href=\"tg://user?id=7\">Ann</a>!");
    assert_eq!(reply.markup, ReplyMarkup::ForceReply { selective: true });
}

#[test]
fn test_custom_taxonomy_and_placeholders_from_config() {
    let config = CapifyConfig {
        presenter: PresenterConfig {
            category_placeholder: "bruh".to_string(),
            subcategory_placeholder: "subbruh".to_string(),
            ..PresenterConfig::default()
        },
        taxonomy: TaxonomyConfig {
            categories: vec![
                CategoryConfig {
                    name: "Home".to_string(),
                    subcategories: vec!["Rent".to_string(), "Misc".to_string()],
                },
                CategoryConfig {
                    name: "Misc".to_string(),
                    subcategories: vec![],
                },
            ],
        },
        ..CapifyConfig::default()
    };
    let orch = ChatOrchestrator::new(&config).unwrap();

    let text = track(&orch, "1");
    assert!(text.contains("category = bruh\n"));
    assert!(text.contains("subcategory = subbruh\n"));

    // "Misc" is both a category and a subcategory: category wins
    assert_eq!(send(&orch, "1", "Misc"), "Transaction category: Misc");
    assert_eq!(send(&orch, "1", "Rent"), "Transaction subcategory: Rent");
}

// =============================================================================
// Classification properties
// =============================================================================

#[test]
fn test_amount_pattern_property() {
    let orch = ChatOrchestrator::default();
    let classifier = orch.classifier();
    for n in [-1000_i64, -1, 0, 1, 7, 42, 1_000_000] {
        assert_eq!(classifier.classify(&n.to_string()), FieldKind::Amount);
    }
    for text in ["", "-", "12.5", "12a", "1e5", "0x10", "١٢"] {
        assert_ne!(classifier.classify(text), FieldKind::Amount, "{:?}", text);
    }
}

#[test]
fn test_amounts_of_any_length_are_stored_exactly() {
    let orch = ChatOrchestrator::default();
    for text in ["99999999999999999999999", "-99999999999999999999999"] {
        assert_eq!(orch.classifier().classify(text), FieldKind::Amount);
        assert_eq!(send(&orch, "1", text), format!("Transaction amount: {}", text));
        assert!(track(&orch, "1").contains(&format!("amount = {}\n", text)));
    }
}

#[test]
fn test_every_valid_day_of_2024_is_a_date() {
    let orch = ChatOrchestrator::default();
    let classifier = orch.classifier();
    let days_in_month = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (m, days) in days_in_month.iter().enumerate() {
        for d in 1..=31 {
            let text = format!("{:02}.{:02}.2024", d, m + 1);
            let expected = if d <= *days {
                FieldKind::Date
            } else {
                FieldKind::Description
            };
            assert_eq!(classifier.classify(&text), expected, "{}", text);
        }
    }
}

#[test]
fn test_classifier_shared_taxonomy_matches_default() {
    let orch = ChatOrchestrator::default();
    let taxonomy = orch.classifier().taxonomy();
    assert_eq!(taxonomy.categories(), Taxonomy::default().categories());
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_users_each_get_their_own_draft() {
    let orch = Arc::new(ChatOrchestrator::default());
    let handles: Vec<_> = (0..8_i64)
        .map(|i| {
            let orch = Arc::clone(&orch);
            thread::spawn(move || {
                let user = i.to_string();
                for _ in 0..50 {
                    send(&orch, &user, &i.to_string());
                    send(&orch, &user, "Everyday");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(orch.sessions().len(), 8);
    for (user, draft) in orch.sessions().all() {
        let expected: BigInt = user.as_str().parse().unwrap();
        assert_eq!(draft.amount, Some(expected));
        assert_eq!(draft.category.as_deref(), Some("Everyday"));
    }
}

#[test]
fn test_concurrent_messages_from_one_user_keep_a_whole_value() {
    let orch = Arc::new(ChatOrchestrator::default());
    let handles: Vec<_> = (1..=4_i64)
        .map(|i| {
            let orch = Arc::clone(&orch);
            thread::spawn(move || {
                for _ in 0..100 {
                    send(&orch, "shared", &i.to_string());
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let amount = orch.current_draft(&UserId::new("shared")).amount.unwrap();
    assert!((BigInt::from(1)..=BigInt::from(4)).contains(&amount));
    assert_eq!(orch.sessions().len(), 1);
}
