//! Five-letter word game
//!
//! LIGHT cycles the letter under the cursor (skipping letters already
//! known to be absent when the H indicator is on), hold LIGHT to step
//! back. ALARM confirms the letter; after the fifth one the guess is
//! scored. Hold ALARM to move the cursor back.
//!
//! The result row shows correct letters solid, misplaced letters blinking
//! and absent letters as `-`. The attempt number sits in slot 3.

pub mod words;

use movement_core::display::{Indicator, Position};
use movement_core::{Event, EventKind, Movement, WatchFace};

use crate::format;
use words::{lookup, ANSWERS, GUESSES, LETTERS};

/// Letters per word
pub const WORD_LENGTH: usize = 5;

/// Guesses before the game is lost
pub const MAX_ATTEMPTS: u8 = 6;

/// Recent answers that are not picked again
const NO_REPEAT: usize = 10;

/// Tick rate while the face is visible
const TICK_HZ: u8 = 2;

/// Ticks during which buttons are ignored after each kind of screen
const TICKS_BAD_GUESS: u8 = 0;
const TICKS_RESULT: u8 = 4;
const TICKS_WIN_LOSE: u8 = 2;

/// Cursor value for "no letter yet"
const BLANK: u8 = LETTERS.len() as u8;

const DICT_SIZE: u16 = (ANSWERS.len() + GUESSES.len()) as u16;

const SECONDS_PER_DAY: i64 = 86_400;

/// Outcome for one letter of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LetterResult {
    Wrong,
    WrongLocation,
    Correct,
}

/// Screens, in the order the "at or after" checks rely on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Title,
    Streak,
    Continue,
    Playing,
    Result,
    Win,
    Lose,
    NoDict,
    AlreadyGuessed,
}

/// Score `guess` against `answer`
///
/// Exact matches are found first; each remaining answer letter can then
/// mark at most one guessed letter as misplaced.
pub fn score(guess: &[u8; WORD_LENGTH], answer: &[u8; WORD_LENGTH]) -> [LetterResult; WORD_LENGTH] {
    let mut result = [LetterResult::Wrong; WORD_LENGTH];
    let mut accounted = [false; WORD_LENGTH];
    for i in 0..WORD_LENGTH {
        if guess[i] == answer[i] {
            result[i] = LetterResult::Correct;
            accounted[i] = true;
        }
    }
    for i in 0..WORD_LENGTH {
        if result[i] != LetterResult::Wrong {
            continue;
        }
        for j in 0..WORD_LENGTH {
            if !accounted[j] && guess[i] == answer[j] {
                result[i] = LetterResult::WrongLocation;
                accounted[j] = true;
                break;
            }
        }
    }
    result
}

/// Word game face
#[derive(Debug, Clone)]
pub struct WordleFace {
    /// Letter index per slot, [`BLANK`] when empty
    elements: [u8; WORD_LENGTH],
    results: [LetterResult; WORD_LENGTH],
    guessed: [u16; MAX_ATTEMPTS as usize],
    known_wrong: [bool; LETTERS.len()],
    attempt: u8,
    position: u8,
    screen: Screen,
    answer: u16,
    recent: [u16; NO_REPEAT],
    recent_next: usize,
    streak: u8,
    continuing: bool,
    skip_wrong_letter: bool,
    ignore_btn_ticks: u8,
    /// Unix time the current game started
    game_started: i64,
}

impl Default for WordleFace {
    fn default() -> Self {
        Self::new()
    }
}

impl WordleFace {
    pub fn new() -> Self {
        let mut face = Self {
            elements: [BLANK; WORD_LENGTH],
            results: [LetterResult::Wrong; WORD_LENGTH],
            guessed: [DICT_SIZE; MAX_ATTEMPTS as usize],
            known_wrong: [false; LETTERS.len()],
            attempt: 0,
            position: 0,
            screen: Screen::Title,
            answer: 0,
            recent: [u16::MAX; NO_REPEAT],
            recent_next: 0,
            streak: 0,
            continuing: false,
            skip_wrong_letter: true,
            ignore_btn_ticks: 0,
            game_started: 0,
        };
        face.reset_all();
        face
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn streak(&self) -> u8 {
        self.streak
    }

    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    /// Result of the last scored guess
    pub fn results(&self) -> &[LetterResult; WORD_LENGTH] {
        &self.results
    }

    /// The word to guess
    pub fn answer(&self) -> &'static [u8; WORD_LENGTH] {
        ANSWERS[usize::from(self.answer)]
    }

    fn first_pos(&self) -> u8 {
        self.results
            .iter()
            .position(|r| *r != LetterResult::Correct)
            .unwrap_or(0) as u8
    }

    fn next_pos(&self) -> u8 {
        (usize::from(self.position) + 1..WORD_LENGTH)
            .find(|&i| self.results[i] != LetterResult::Correct)
            .unwrap_or(WORD_LENGTH) as u8
    }

    fn prev_pos(&self) -> u8 {
        (0..usize::from(self.position))
            .rev()
            .find(|&i| self.results[i] != LetterResult::Correct)
            .map(|i| i as u8)
            .unwrap_or(self.position)
    }

    fn step_letter(&mut self, forward: bool) {
        let slot = &mut self.elements[usize::from(self.position)];
        let count = LETTERS.len() as u8;
        loop {
            *slot = match (*slot >= count, forward) {
                (true, true) => 0,
                (true, false) => count - 1,
                (false, true) => (*slot + 1) % count,
                (false, false) => (*slot + count - 1) % count,
            };
            if !(self.skip_wrong_letter && self.known_wrong[usize::from(*slot)]) {
                break;
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.attempt > 0 || self.elements.iter().any(|&e| e != BLANK)
    }

    fn reset_all(&mut self) {
        self.elements = [BLANK; WORD_LENGTH];
        self.results = [LetterResult::Wrong; WORD_LENGTH];
        self.known_wrong = [false; LETTERS.len()];
        self.guessed = [DICT_SIZE; MAX_ATTEMPTS as usize];
        self.attempt = 0;
    }

    fn reset_incorrect(&mut self) {
        for (element, result) in self.elements.iter_mut().zip(self.results.iter()) {
            if *result != LetterResult::Correct {
                *element = BLANK;
            }
        }
    }

    fn guess_word(&self) -> [u8; WORD_LENGTH] {
        let mut word = [b' '; WORD_LENGTH];
        for (out, &e) in word.iter_mut().zip(self.elements.iter()) {
            if let Some(letter) = LETTERS.get(usize::from(e)) {
                *out = *letter;
            }
        }
        word
    }

    fn update_known_wrong(&mut self) {
        let mut misplaced = [false; LETTERS.len()];
        for (e, r) in self.elements.iter().zip(self.results.iter()) {
            if *r == LetterResult::WrongLocation {
                if let Some(m) = misplaced.get_mut(usize::from(*e)) {
                    *m = true;
                }
            }
        }
        // A letter guessed more often than it appears scores Wrong once
        // the answer's copies are used up; it is not absent.
        for (e, r) in self.elements.iter().zip(self.results.iter()) {
            let e = usize::from(*e);
            if *r == LetterResult::Wrong && e < LETTERS.len() && !misplaced[e] {
                self.known_wrong[e] = true;
            }
        }
    }

    // --- Drawing ----------------------------------------------------------

    fn draw_letter(&self, movement: &mut Movement<'_>, dash: bool) {
        let ch = match LETTERS.get(usize::from(self.elements[usize::from(self.position)])) {
            Some(letter) => char::from(*letter),
            None if dash => '-',
            None => ' ',
        };
        movement.display.character(ch, self.position + 5);
    }

    fn draw_all_letters(&self, movement: &mut Movement<'_>) {
        movement.display.character(' ', 4);
        for (i, &e) in self.elements.iter().enumerate() {
            let ch = LETTERS.get(usize::from(e)).map(|l| char::from(*l)).unwrap_or(' ');
            movement.display.character(ch, i as u8 + 5);
        }
    }

    fn draw_skip_indicator(&self, movement: &mut Movement<'_>) {
        if self.screen < Screen::Playing {
            movement.display.character(if self.skip_wrong_letter { 'H' } else { ' ' }, 3);
        }
    }

    fn show_title(&mut self, movement: &mut Movement<'_>) {
        self.screen = Screen::Title;
        let display = &mut movement.display;
        display.text_with_fallback(Position::TopLeft, "Wdl", "WO");
        display.text(Position::TopRight, "  ");
        display.text(Position::Bottom, "WordLE");
        self.draw_skip_indicator(movement);
    }

    fn show_streak(&mut self, movement: &mut Movement<'_>) {
        self.screen = Screen::Streak;
        let display = &mut movement.display;
        display.text_with_fallback(Position::TopLeft, "Wdl", "WO");
        display.text(Position::TopRight, "  ");
        display.text(Position::Bottom, &format::<6>(format_args!("St{:4}", self.streak)));
        display.set_indicator(Indicator::Colon);
        self.draw_skip_indicator(movement);
    }

    fn show_continue(&mut self, movement: &mut Movement<'_>) {
        self.screen = Screen::Continue;
        movement.display.text(Position::Bottom, "Cont ");
        self.draw_skip_indicator(movement);
        self.draw_continue_choice(movement);
    }

    fn draw_continue_choice(&self, movement: &mut Movement<'_>) {
        movement.display.character(if self.continuing { 'y' } else { 'n' }, 9);
    }

    fn show_playing(&mut self, movement: &mut Movement<'_>) {
        self.screen = Screen::Playing;
        let attempt = format::<3>(format_args!("{}", self.attempt + 1));
        if let Some(ch) = attempt.chars().next() {
            movement.display.character(ch, 3);
        }
        self.draw_all_letters(movement);
    }

    fn draw_result(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let mut row = [b' '; WORD_LENGTH + 1];
        for (i, (e, r)) in self.elements.iter().zip(self.results.iter()).enumerate() {
            let letter = LETTERS.get(usize::from(*e)).copied().unwrap_or(b' ');
            row[i + 1] = match r {
                LetterResult::Wrong => b'-',
                LetterResult::Correct => letter,
                LetterResult::WrongLocation if subsecond % 2 == 1 => b' ',
                LetterResult::WrongLocation => letter,
            };
        }
        if let Ok(text) = core::str::from_utf8(&row) {
            movement.display.text(Position::Bottom, text);
        }
    }

    fn draw_win(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let display = &mut movement.display;
        display.text(Position::TopRight, "  ");
        display.text_with_fallback(Position::TopLeft, "WIN", "W ");
        display.text(Position::Bottom, if subsecond % 2 == 1 { " NICE " } else { " JOb  " });
    }

    fn draw_lose(&self, movement: &mut Movement<'_>, subsecond: u8) {
        let display = &mut movement.display;
        display.text(Position::TopRight, "  ");
        display.text_with_fallback(Position::Top, "LOSE", "L ");
        if subsecond % 2 == 1 {
            let mut row = [b' '; WORD_LENGTH + 1];
            row[1..].copy_from_slice(self.answer());
            if let Ok(text) = core::str::from_utf8(&row) {
                display.text(Position::Bottom, text);
            }
        } else {
            display.text(Position::Bottom, "      ");
        }
    }

    // --- Game flow --------------------------------------------------------

    fn reset_board(&mut self, movement: &mut Movement<'_>) {
        self.reset_all();
        loop {
            let candidate = movement.rng().below(ANSWERS.len() as u32) as u16;
            if !self.recent.contains(&candidate) {
                self.answer = candidate;
                break;
            }
        }
        movement.display.clear_indicator(Indicator::Colon);
        self.position = self.first_pos();
        self.show_playing(movement);
        movement.display.character('-', 5);
    }

    fn finish_game(&mut self) {
        self.reset_all();
        self.ignore_btn_ticks = TICKS_WIN_LOSE;
        self.recent[self.recent_next] = self.answer;
        self.recent_next = (self.recent_next + 1) % NO_REPEAT;
    }

    fn score_guess(&mut self, movement: &mut Movement<'_>) {
        let word = self.guess_word();
        let Some(index) = lookup(&word) else {
            self.screen = Screen::NoDict;
            movement.display.text(Position::Bottom, "nodict");
            self.ignore_btn_ticks = TICKS_BAD_GUESS;
            return;
        };
        if self.guessed.contains(&index) {
            self.screen = Screen::AlreadyGuessed;
            movement.display.text(Position::Bottom, "GUESSD");
            self.ignore_btn_ticks = TICKS_BAD_GUESS;
            return;
        }
        self.guessed[usize::from(self.attempt)] = index;

        self.results = score(&word, self.answer());
        if self.results.iter().all(|r| *r == LetterResult::Correct) {
            self.screen = Screen::Win;
            self.finish_game();
            self.streak = self.streak.saturating_add(1).min(0x7F);
            return;
        }
        self.attempt += 1;
        if self.attempt >= MAX_ATTEMPTS {
            self.screen = Screen::Lose;
            self.finish_game();
            self.streak = 0;
            return;
        }
        self.update_known_wrong();
        self.screen = Screen::Result;
        self.ignore_btn_ticks = TICKS_RESULT;
    }

    /// Screen-level reaction to a button; false when the press edits letters
    fn act_on_button(&mut self, movement: &mut Movement<'_>, alarm: bool) -> bool {
        if self.ignore_btn_ticks > 0 {
            return true;
        }
        match self.screen {
            Screen::Result => {
                self.reset_incorrect();
                self.position = self.first_pos();
                self.show_playing(movement);
            }
            Screen::Title => {
                if self.is_playing() {
                    self.continuing = true;
                    self.show_continue(movement);
                } else {
                    self.show_streak(movement);
                }
            }
            Screen::Streak => {
                self.game_started = movement.utc_date_time().to_unix(0);
                self.reset_board(movement);
            }
            Screen::Win | Screen::Lose => self.show_title(movement),
            Screen::NoDict | Screen::AlreadyGuessed => {
                self.position = self.first_pos();
                self.show_playing(movement);
            }
            Screen::Continue if alarm => {
                if self.continuing {
                    self.show_playing(movement);
                } else {
                    self.reset_board(movement);
                    self.streak = 0;
                    self.show_streak(movement);
                }
            }
            Screen::Continue => {
                self.continuing = !self.continuing;
                self.draw_continue_choice(movement);
            }
            Screen::Playing => return false,
        }
        true
    }

    fn enter(&mut self, movement: &mut Movement<'_>) {
        let now = movement.utc_date_time().to_unix(0);
        // An unfinished game from yesterday breaks the streak
        if now >= self.game_started + SECONDS_PER_DAY && self.is_playing() {
            self.streak = 0;
            self.reset_board(movement);
        }
        if self.is_playing() && self.screen >= Screen::Result {
            self.reset_incorrect();
            self.position = self.first_pos();
        }
        movement.request_tick_frequency(TICK_HZ);
        movement.display.clear_all_indicators();
        self.show_title(movement);
    }
}

impl WatchFace for WordleFace {
    fn setup(&mut self, _face_index: u8, _movement: &mut Movement<'_>) {}

    fn activate(&mut self, movement: &mut Movement<'_>) {
        self.enter(movement);
    }

    fn handle(&mut self, event: Event, movement: &mut Movement<'_>) -> bool {
        match event.kind {
            EventKind::Tick => {
                self.ignore_btn_ticks = self.ignore_btn_ticks.saturating_sub(1);
                match self.screen {
                    Screen::Playing if event.subsecond % 2 == 1 => self.draw_letter(movement, true),
                    Screen::Playing => movement.display.character(' ', self.position + 5),
                    Screen::Result => self.draw_result(movement, event.subsecond),
                    Screen::Lose => self.draw_lose(movement, event.subsecond),
                    Screen::Win => self.draw_win(movement, event.subsecond),
                    _ => {}
                }
            }
            EventKind::LightButtonUp => {
                if !self.act_on_button(movement, false) {
                    self.step_letter(true);
                    self.draw_letter(movement, true);
                }
            }
            EventKind::LightLongPress => {
                if self.screen < Screen::Playing {
                    self.skip_wrong_letter = !self.skip_wrong_letter;
                    self.draw_skip_indicator(movement);
                } else if self.screen == Screen::Playing {
                    self.step_letter(false);
                    self.draw_letter(movement, true);
                }
            }
            EventKind::AlarmButtonUp => {
                if self.act_on_button(movement, true) {
                    return true;
                }
                self.draw_letter(movement, true);
                if self.elements[usize::from(self.position)] == BLANK {
                    return true;
                }
                self.position = self.next_pos();
                if usize::from(self.position) >= WORD_LENGTH {
                    self.score_guess(movement);
                }
            }
            EventKind::AlarmLongPress => {
                if self.screen == Screen::Playing {
                    self.draw_letter(movement, true);
                    self.position = self.prev_pos();
                }
            }
            EventKind::LightButtonDown | EventKind::Activate => {}
            EventKind::Timeout => {
                if self.screen >= Screen::Result {
                    self.reset_incorrect();
                    self.position = self.first_pos();
                    self.show_title(movement);
                }
            }
            EventKind::LowEnergyUpdate => {
                if self.screen != Screen::Title {
                    self.show_title(movement);
                }
            }
            EventKind::ModeLongPress => {
                if self.screen >= Screen::Playing {
                    self.enter(movement);
                } else {
                    movement.move_to_face(0);
                }
            }
            _ => return movement.default_loop_handler(event),
        }
        true
    }

    fn resign(&mut self, _movement: &mut Movement<'_>) {}

    fn name(&self) -> &'static str {
        "wordle"
    }
}

#[cfg(test)]
mod tests {
    use super::words::letter_index;
    use super::*;
    use crate::testing::{send, start, ticks};
    use movement_core::mock::{ScriptedRng, TestBench};
    use LetterResult::*;

    /// Type `word` assuming every slot is blank and no letter is skipped
    fn enter_word(face: &mut WordleFace, m: &mut Movement<'_>, word: &[u8; WORD_LENGTH]) {
        for letter in word.iter() {
            let presses = letter_index(*letter).unwrap() + 1;
            for _ in 0..presses {
                send(face, m, EventKind::LightButtonUp);
            }
            send(face, m, EventKind::AlarmButtonUp);
        }
    }

    fn tick(face: &mut WordleFace, m: &mut Movement<'_>, subsecond: u8) {
        face.handle(Event::new(EventKind::Tick, subsecond), m);
    }

    fn new_game(bench: &mut TestBench, answer: u32) -> (WordleFace, Movement<'_>) {
        bench.rng = ScriptedRng::new(&[answer]);
        let mut m = bench.movement();
        let mut face = WordleFace::new();
        start(&mut face, 0, &mut m);
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(face.screen(), Screen::Streak);
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(face.screen(), Screen::Playing);
        (face, m)
    }

    #[test]
    fn test_score_counts_each_answer_letter_once() {
        assert_eq!(score(b"ADIEU", b"APPLE"), [Correct, Wrong, Wrong, WrongLocation, Wrong]);
        assert_eq!(score(b"PAPPS", b"APPLE"), [WrongLocation, WrongLocation, Correct, Wrong, Wrong]);
        assert_eq!(score(b"APPLE", b"APPLE"), [Correct; WORD_LENGTH]);
    }

    #[test]
    fn test_title_screen() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut face = WordleFace::new();
        start(&mut face, 0, &mut m);
        assert_eq!(m.tick_frequency(), TICK_HZ);
        assert_eq!(m.display.text_at(Position::TopLeft).as_str(), "WO");
        assert_eq!(m.display.text_at(Position::TopRight).as_str(), " H");
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "WordLE");
        send(&mut face, &mut m, EventKind::LightLongPress);
        assert_eq!(m.display.text_at(Position::TopRight).as_str(), "  ");
    }

    #[test]
    fn test_adieu_against_apple() {
        let mut bench = TestBench::new();
        let (mut face, mut m) = new_game(&mut bench, 0);
        assert_eq!(face.answer(), b"APPLE");
        enter_word(&mut face, &mut m, b"ADIEU");
        assert_eq!(face.screen(), Screen::Result);
        assert_eq!(face.results(), &[Correct, Wrong, Wrong, WrongLocation, Wrong]);
        assert_eq!(face.attempt(), 1);

        tick(&mut face, &mut m, 0);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " A--E-");
        tick(&mut face, &mut m, 1);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " A-- -");
        ticks(&mut face, &mut m, usize::from(TICKS_RESULT) - 2);

        send(&mut face, &mut m, EventKind::Timeout);
        assert_eq!(face.screen(), Screen::Title);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "WordLE");

        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(face.screen(), Screen::Continue);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "Cont y");
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(face.screen(), Screen::Playing);
        assert_eq!(m.display.text_at(Position::TopRight).as_str(), " 2");
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " A    ");
    }

    #[test]
    fn test_known_wrong_letters_are_skipped() {
        let mut bench = TestBench::new();
        let (mut face, mut m) = new_game(&mut bench, 0);
        enter_word(&mut face, &mut m, b"ADIEU");
        for _ in 0..TICKS_RESULT {
            tick(&mut face, &mut m, 0);
        }
        send(&mut face, &mut m, EventKind::LightButtonUp);
        assert_eq!(face.screen(), Screen::Playing);
        // Cursor starts past the solved A; D is known absent
        for _ in 0..3 {
            send(&mut face, &mut m, EventKind::LightButtonUp);
        }
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " AE   ");
    }

    #[test]
    fn test_win_bumps_streak() {
        let mut bench = TestBench::new();
        let (mut face, mut m) = new_game(&mut bench, 2);
        assert_eq!(face.answer(), b"SLATE");
        enter_word(&mut face, &mut m, b"SLATE");
        assert_eq!(face.screen(), Screen::Win);
        assert_eq!(face.streak(), 1);
        tick(&mut face, &mut m, 1);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " NICE ");
        // Buttons wait out the win screen
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(face.screen(), Screen::Win);
        tick(&mut face, &mut m, 0);
        send(&mut face, &mut m, EventKind::AlarmButtonUp);
        assert_eq!(face.screen(), Screen::Title);
    }

    #[test]
    fn test_unknown_and_repeated_words() {
        let mut bench = TestBench::new();
        let (mut face, mut m) = new_game(&mut bench, 0);
        enter_word(&mut face, &mut m, b"AAAAA");
        assert_eq!(face.screen(), Screen::NoDict);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), "nodict");
        assert_eq!(face.attempt(), 0);
    }

    #[test]
    fn test_six_misses_lose() {
        let mut bench = TestBench::new();
        let (mut face, mut m) = new_game(&mut bench, 0);
        let guesses: [&[u8; 5]; 6] = [b"CRANE", b"SLATE", b"TRAIN", b"STONE", b"ROUND", b"SOUND"];
        for word in guesses.iter() {
            // Start each guess from a clean board with nothing skipped
            face.results = [Wrong; WORD_LENGTH];
            face.elements = [BLANK; WORD_LENGTH];
            face.known_wrong = [false; LETTERS.len()];
            face.position = 0;
            face.screen = Screen::Playing;
            face.ignore_btn_ticks = 0;
            enter_word(&mut face, &mut m, word);
        }
        assert_eq!(face.screen(), Screen::Lose);
        assert_eq!(face.streak(), 0);
        tick(&mut face, &mut m, 1);
        assert_eq!(m.display.text_at(Position::Bottom).as_str(), " APPLE");
    }

    #[test]
    fn test_mode_long_press_leaves_from_title() {
        let mut bench = TestBench::new();
        let mut m = bench.movement();
        let mut face = WordleFace::new();
        start(&mut face, 0, &mut m);
        send(&mut face, &mut m, EventKind::ModeLongPress);
        assert!(m.face_change_pending());
    }
}
