use ir_battleship::{
    GameResult, GameSession, GridPoint, InputEvent, LoopbackLink, Phase, ReliableLink,
    Role, SessionConfig, ShotOutcome, DOT_SHIP,
};

/// One device without a player: the test supplies its input.
struct Peer {
    session: GameSession,
    link: ReliableLink<LoopbackLink>,
    history: Vec<Phase>,
}

impl Peer {
    fn new(link: LoopbackLink, seed: u64) -> Self {
        let config = SessionConfig {
            banner_ticks: 0,
            ..SessionConfig::default()
        };
        Self {
            session: GameSession::new(config, &[DOT_SHIP], seed).unwrap(),
            link: ReliableLink::new(link, config.link),
            history: Vec::new(),
        }
    }

    fn step(&mut self, inputs: &[InputEvent]) -> Option<Phase> {
        let next = self.session.tick(inputs, &mut self.link);
        self.link.poll();
        if let Some(phase) = next {
            self.history.push(phase);
        }
        next
    }

    fn phase(&self) -> Phase {
        self.session.phase()
    }
}

fn step_both(a: &mut Peer, b: &mut Peer, ia: &[InputEvent], ib: &[InputEvent]) {
    a.step(ia);
    b.step(ib);
}

fn idle_until<F>(a: &mut Peer, b: &mut Peer, limit: u32, mut done: F)
where
    F: FnMut(&Peer, &Peer) -> bool,
{
    for _ in 0..limit {
        if done(a, b) {
            return;
        }
        step_both(a, b, &[], &[]);
    }
    panic!("condition not reached: a {:?}, b {:?}", a.phase(), b.phase());
}

/// Feed `events` to `peer` one per tick while `other` idles.
fn press(peer: &mut Peer, other: &mut Peer, events: &[InputEvent]) {
    for &event in events {
        peer.step(&[event]);
        other.step(&[]);
    }
}

/// A claims player one and both place a single dot: A at (2,2), B at (0,0).
fn ready_pair() -> (Peer, Peer) {
    let (l1, l2) = LoopbackLink::pair();
    let mut a = Peer::new(l1, 1);
    let mut b = Peer::new(l2, 2);

    step_both(&mut a, &mut b, &[InputEvent::Push], &[InputEvent::Push]);
    assert_eq!((a.phase(), b.phase()), (Phase::Connecting, Phase::Connecting));
    step_both(&mut a, &mut b, &[InputEvent::Button], &[]);
    idle_until(&mut a, &mut b, 2000, |a, b| {
        a.phase() == Phase::PlacingShips && b.phase() == Phase::PlacingShips
    });
    assert_eq!(a.session.role(), Some(Role::PlayerOne));
    assert_eq!(b.session.role(), Some(Role::PlayerTwo));

    // Clear the placement banners.
    step_both(&mut a, &mut b, &[], &[]);
    press(&mut a, &mut b, &[InputEvent::North, InputEvent::Button]);
    assert_eq!(a.phase(), Phase::MyTurn);
    use InputEvent::*;
    press(&mut b, &mut a, &[West, West, North, North, North, Button]);
    assert_eq!(b.phase(), Phase::OpponentTurn);
    assert_eq!(a.session.board().ship(0).unwrap().pos(), GridPoint::new(2, 2));
    assert_eq!(b.session.board().ship(0).unwrap().pos(), GridPoint::new(0, 0));
    (a, b)
}

/// Steer A's targetter from the spawn point and fire.
fn fire(a: &mut Peer, b: &mut Peer, path: &[InputEvent], target: GridPoint) {
    // Clear the turn banner.
    step_both(a, b, &[], &[]);
    press(a, b, path);
    assert_eq!(a.session.board().targetter(), target);
    press(a, b, &[InputEvent::Push]);
    assert_eq!(a.phase(), Phase::AwaitingResult);
}

#[test]
fn sinking_the_last_ship_ends_the_game() {
    let (mut a, mut b) = ready_pair();
    use InputEvent::*;
    fire(&mut a, &mut b, &[West, West, North, North, North], GridPoint::new(0, 0));
    let fired_at = a.history.len();
    let defended_from = b.history.len();

    let mut shot = None;
    let mut b_sunk_at_game_over = false;
    for _ in 0..5000 {
        if a.step(&[]) == Some(Phase::OpponentTurn) {
            shot = a.session.last_shot();
        }
        if b.step(&[]) == Some(Phase::GameOver) {
            b_sunk_at_game_over = b.session.board().ship(0).unwrap().is_sunk();
        }
        if a.session.result().is_some() && b.session.result().is_some() {
            break;
        }
    }

    assert_eq!(shot, Some((GridPoint::new(0, 0), ShotOutcome::Hit)));
    assert!(b_sunk_at_game_over);
    assert_eq!(a.session.result(), Some(GameResult::Won));
    assert_eq!(b.session.result(), Some(GameResult::Lost));
    assert_eq!(
        &a.history[fired_at..],
        &[Phase::OpponentTurn, Phase::GameOver]
    );
    // B has already moved on to the next round's placement.
    assert!(b.history[defended_from..].starts_with(&[Phase::AwaitingSendConfirm, Phase::GameOver]));
    assert_eq!(b.link.stats().sent, 2);
    assert!(!a.history[fired_at..].contains(&Phase::MyTurn));
}

#[test]
fn a_miss_hands_the_turn_over() {
    let (mut a, mut b) = ready_pair();
    use InputEvent::*;
    fire(&mut a, &mut b, &[West, North, North], GridPoint::new(1, 1));
    let b_sent_before = b.link.stats().sent;

    idle_until(&mut a, &mut b, 5000, |a, b| {
        a.phase() == Phase::OpponentTurn && b.phase() == Phase::MyTurn
    });

    assert_eq!(
        a.session.last_shot(),
        Some((GridPoint::new(1, 1), ShotOutcome::Miss))
    );
    let misses = a.session.board().shot_misses();
    assert!(misses.get(1, 1).unwrap());
    assert_eq!(misses.count_ones(), 1);

    let ship = b.session.board().ship(0).unwrap();
    assert!(!ship.is_sunk());
    assert_eq!(ship.hit_flags(), &[false]);
    assert_eq!(b.link.stats().sent, b_sent_before + 1);
    assert_eq!(b.link.stats().confirmed, 1);
    assert_eq!(a.link.stats().give_ups, 0);
    assert_eq!(b.link.stats().give_ups, 0);
    // The reply arrived long before the result timeout.
    assert!(!a.history.contains(&Phase::GameOver));
    assert_eq!(a.session.result(), None);
}

/// Place ships and fire from the spawn point as soon as each phase allows.
fn eager_inputs(peer: &Peer) -> &'static [InputEvent] {
    match peer.phase() {
        Phase::PlacingShips => &[InputEvent::Button],
        Phase::MyTurn => &[InputEvent::Push],
        _ => &[],
    }
}

#[test]
fn queued_lower_claim_outranks_an_acknowledged_higher_one() {
    let (l1, l2) = LoopbackLink::pair();
    let mut a = Peer::new(l1, 0);
    let mut b = Peer::new(l2, 1);
    step_both(&mut a, &mut b, &[InputEvent::Push], &[InputEvent::Push]);
    assert_ne!(a.session.nonce(), b.session.nonce());
    let (lo, hi) = if a.session.nonce() < b.session.nonce() {
        (&mut a, &mut b)
    } else {
        (&mut b, &mut a)
    };

    // The higher claim reaches the wire while the lower one is still queued,
    // so the lower peer acknowledges it before sending its own.
    hi.link.poll();
    hi.link.poll();
    lo.step(&[InputEvent::Button]);
    hi.step(&[]);
    lo.step(&[]);
    hi.step(&[InputEvent::Button]);

    idle_until(lo, hi, 2000, |lo, hi| {
        lo.phase() != Phase::Connecting && hi.phase() != Phase::Connecting
    });
    for _ in 0..300 {
        step_both(lo, hi, &[], &[]);
    }

    assert_eq!(lo.session.role(), Some(Role::PlayerOne));
    assert_eq!(hi.session.role(), Some(Role::PlayerTwo));
    assert_eq!(lo.link.stats().give_ups + hi.link.stats().give_ups, 0);
}

#[test]
fn retransmitted_final_shot_is_not_answered_next_round() {
    let (mut a, mut b) = ready_pair();
    use InputEvent::*;
    fire(&mut a, &mut b, &[West, West, North, North, North], GridPoint::new(0, 0));
    // B's confirm burst for the winning shot is lost, so A retransmits it.
    b.link.link().drop_next(3);

    let mut ticks = 0;
    while a.session.rounds_played() < 2 || b.session.rounds_played() < 2 {
        let (ia, ib) = (eager_inputs(&a), eager_inputs(&b));
        step_both(&mut a, &mut b, ia, ib);
        assert!(
            !(a.phase().is_attacking() && b.phase().is_attacking()),
            "both attacking at tick {}: a {:?}, b {:?}",
            ticks,
            a.history,
            b.history
        );
        ticks += 1;
        assert!(ticks < 10_000, "second round never finished");
    }

    assert!(a.link.stats().retransmissions >= 1);
    assert_eq!(a.session.result(), Some(GameResult::Won));
    assert_eq!(b.session.result(), Some(GameResult::Lost));
    // A hit and a game-over per round, nothing for the repeated shot.
    assert_eq!(b.link.stats().sent, 4);
}
