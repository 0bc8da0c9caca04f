use ir_battleship::{
    render, GameSession, GridPoint, InputEvent, Mailbox, Message, Phase, Screen, SessionConfig,
    TextDisplay, DOT_SHIP, L_SHIP,
};

#[derive(Default)]
struct NullMailbox {
    inbound: Option<Message>,
}

impl Mailbox for NullMailbox {
    fn enqueue(&mut self, _msg: Message) {}

    fn last_message_confirmed_delivered(&self, _candidate: Message) -> bool {
        true
    }

    fn latest_unread_inbound(&self) -> Option<Message> {
        self.inbound
    }

    fn mark_consumed(&mut self) {
        self.inbound = None;
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        banner_ticks: 0,
        ..SessionConfig::default()
    }
}

/// A player-two session in `PlacingShips` with its banner cleared.
fn placing(fleet: &[ir_battleship::ShipShape]) -> (GameSession, NullMailbox) {
    let mut session = GameSession::new(config(), fleet, 1).unwrap();
    let mut mailbox = NullMailbox::default();
    session.tick(&[InputEvent::Push], &mut mailbox);
    mailbox.inbound = Some(Message::request_player_one(0));
    assert_eq!(session.tick(&[], &mut mailbox), Some(Phase::PlacingShips));
    session.tick(&[], &mut mailbox);
    assert_eq!(session.banner(), None);
    (session, mailbox)
}

#[test]
fn banner_replaces_the_board() {
    let session = GameSession::with_default_fleet(SessionConfig::default(), 1).unwrap();
    let mut screen = TextDisplay::new();
    render(&session, &mut screen);
    assert_eq!(screen.frame(), "BATTLESHIPS\n");
    assert_eq!(screen.refreshes(), 1);
}

#[test]
fn active_ship_is_drawn_while_placing() {
    let (session, _) = placing(&[L_SHIP, DOT_SHIP]);
    let mut screen = TextDisplay::new();
    render(&session, &mut screen);

    let ship = session.board().active_ship().unwrap();
    for cell in ship.cells() {
        assert!(screen.is_lit(cell));
    }
    let lit = GridPoint::all().filter(|&p| screen.is_lit(p)).count();
    assert_eq!(lit, ship.offsets().len());
    // Idle ships stay hidden.
    assert_eq!(screen.frame().matches('#').count(), lit);
}

#[test]
fn hit_cells_go_dark_on_our_board() {
    let (mut session, mut mailbox) = placing(&[DOT_SHIP, DOT_SHIP]);
    // Place the first dot, move the second out of the way and place it too.
    session.tick(&[InputEvent::Button], &mut mailbox);
    session.tick(&[InputEvent::West], &mut mailbox);
    assert_eq!(session.tick(&[InputEvent::Button], &mut mailbox), Some(Phase::OpponentTurn));
    session.tick(&[], &mut mailbox);

    let first = session.board().ship(0).unwrap().pos();
    let second = session.board().ship(1).unwrap().pos();
    assert_ne!(first, second);
    mailbox.inbound = Some(Message::coordinate(first).unwrap());
    assert_eq!(session.tick(&[], &mut mailbox), Some(Phase::AwaitingSendConfirm));
    assert_eq!(session.tick(&[], &mut mailbox), Some(Phase::MyTurn));

    // Take our shot and come back to the defending view.
    session.tick(&[], &mut mailbox);
    assert_eq!(session.tick(&[InputEvent::Push], &mut mailbox), Some(Phase::AwaitingResult));
    mailbox.inbound = Some(Message::SendMiss);
    assert_eq!(session.tick(&[], &mut mailbox), Some(Phase::OpponentTurn));
    session.tick(&[], &mut mailbox);
    assert_eq!(session.banner(), None);

    let mut screen = TextDisplay::new();
    render(&session, &mut screen);
    assert!(!screen.is_lit(first));
    assert!(screen.is_lit(second));
}

#[test]
fn targetter_and_hits_are_drawn_on_our_turn() {
    let (mut session, mut mailbox) = placing(&[DOT_SHIP]);
    session.tick(&[InputEvent::Button], &mut mailbox);
    assert_eq!(session.phase(), Phase::OpponentTurn);
    session.tick(&[], &mut mailbox);
    mailbox.inbound = Some(Message::coordinate(GridPoint::new(0, 0)).unwrap());
    session.tick(&[], &mut mailbox);
    assert_eq!(session.tick(&[], &mut mailbox), Some(Phase::MyTurn));
    session.tick(&[], &mut mailbox);

    // Fire at the spawn point and score a hit.
    let hit_at = session.board().targetter();
    session.tick(&[InputEvent::Push], &mut mailbox);
    mailbox.inbound = Some(Message::SendHit);
    session.tick(&[], &mut mailbox);
    mailbox.inbound = Some(Message::coordinate(GridPoint::new(0, 1)).unwrap());
    session.tick(&[], &mut mailbox);
    assert_eq!(session.tick(&[], &mut mailbox), Some(Phase::MyTurn));
    session.tick(&[], &mut mailbox);
    session.tick(&[InputEvent::North, InputEvent::North], &mut mailbox);

    let mut screen = TextDisplay::new();
    render(&session, &mut screen);
    let cursor = session.board().targetter();
    assert_ne!(cursor, hit_at);
    assert!(screen.is_lit(hit_at));
    assert!(screen.is_lit(cursor));
    assert_eq!(GridPoint::all().filter(|&p| screen.is_lit(p)).count(), 2);
}

#[test]
fn frames_only_change_when_the_picture_does() {
    let mut screen = TextDisplay::new();
    screen.clear();
    screen.draw_point(GridPoint::new(0, 0), true);
    screen.refresh();
    let first = screen.frame().to_string();
    assert!(first.starts_with("#....\n"));
    assert_eq!(first.lines().count(), 7);

    screen.clear();
    screen.draw_point(GridPoint::new(0, 0), true);
    screen.draw_point(GridPoint::new(9, 9), true);
    screen.refresh();
    assert_eq!(screen.frame(), first);
    assert_eq!(screen.refreshes(), 2);
    assert!(!screen.is_lit(GridPoint::new(9, 9)));
}
