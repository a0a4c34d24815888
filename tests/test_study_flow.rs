use anyhow::Result;
use flashdeck::application::{DeckAccessor, FetchClient, ProgressStore, StudySession};
use flashdeck::config::ApiConfig;
use flashdeck::util::testing::{sample_deck_json, MemoryStore, MockReply, MockScheduler, MockTransport};

fn client(transport: &MockTransport) -> FetchClient<MockTransport, MockScheduler> {
    FetchClient::new(transport.clone(), MockScheduler::new(), ApiConfig::default())
}

#[tokio::test]
async fn given_swipes_saved_when_reopening_language_then_resumes_position() -> Result<()> {
    // Arrange
    let transport = MockTransport::builder()
        .always(MockReply::json(&sample_deck_json("es", 10)))
        .build();
    let client = client(&transport);
    let mut store = ProgressStore::new(MemoryStore::new());

    let deck = DeckAccessor::new(&client).fetch_deck("es").await?;
    let mut session = StudySession::restore(&deck, store.load("es").as_ref());
    for _ in 0..3 {
        let (index, order) = session.advance();
        store.save("es", index, &order);
    }

    // Act
    let deck = DeckAccessor::new(&client).fetch_deck("es").await?;
    let resumed = StudySession::restore(&deck, store.load("es").as_ref());

    // Assert
    assert!(resumed.has_progress());
    assert_eq!(resumed.index(), 3);
    assert_eq!(resumed.current_card().map(|c| c.number), Some(4));
    assert_eq!(resumed.order(), vec![4, 5, 6, 7, 8, 9, 10, 1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn given_deck_grew_since_last_visit_when_restoring_then_starts_from_natural_order() -> Result<()> {
    // Arrange
    let transport = MockTransport::builder()
        .then(MockReply::json(&sample_deck_json("es", 5)))
        .then(MockReply::json(&sample_deck_json("es", 10)))
        .build();
    let client = client(&transport);
    let mut store = ProgressStore::new(MemoryStore::new());

    let small = DeckAccessor::new(&client).fetch_deck("es").await?;
    let mut session = StudySession::restore(&small, None);
    let (index, order) = session.advance();
    store.save("es", index, &order);

    // Act
    let grown = DeckAccessor::new(&client).fetch_deck("es").await?;
    let session = StudySession::restore(&grown, store.load("es").as_ref());

    // Assert
    assert!(!session.has_progress());
    assert_eq!(session.index(), 0);
    assert_eq!(session.order(), (1..=10).collect::<Vec<_>>());
    // The stale record is left for the next save to overwrite
    assert_eq!(store.load("es").map(|r| r.card_order.len()), Some(5));
    Ok(())
}

#[tokio::test]
async fn given_reset_when_reopening_then_no_progress() -> Result<()> {
    let transport = MockTransport::builder()
        .always(MockReply::json(&sample_deck_json("haw", 4)))
        .build();
    let client = client(&transport);
    let mut store = ProgressStore::new(MemoryStore::new());
    let deck = DeckAccessor::new(&client).fetch_deck("haw").await?;
    let mut session = StudySession::restore(&deck, None);
    let (index, order) = session.advance();
    store.save("haw", index, &order);

    session.reset();
    store.reset("haw");

    let reopened = StudySession::restore(&deck, store.load("haw").as_ref());
    assert!(!reopened.has_progress());
    assert_eq!(reopened.current_card().map(|c| c.number), Some(1));
    Ok(())
}
