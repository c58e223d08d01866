//! Pure HTML rendering of a room's current view.
//!
//! The push stream sends viewers a pre-rendered board fragment rather
//! than raw state: an 8x8 grid of squares with piece images, the room
//! header, the opponent-thinking hint, and the game-over banner. All
//! functions here are pure string builders over a [`BoardSnapshot`];
//! a malformed snapshot degrades to empty squares instead of failing.

use tempo_types::BoardSnapshot;

/// Square count of the rendered grid.
const SQUARE_COUNT: u8 = 64;

/// Decode the piece-placement field of a snapshot into 64 optional
/// piece letters, indexed 0 = a1 through 63 = h8.
///
/// FEN letters are kept as-is: uppercase for the white pieces,
/// lowercase for the black pieces. Unparseable input yields an empty
/// board.
fn piece_map(snapshot: &BoardSnapshot) -> Vec<Option<char>> {
    let mut squares = vec![None; usize::from(SQUARE_COUNT)];
    let Some(placement) = snapshot.as_str().split(' ').next() else {
        return squares;
    };

    // The first FEN rank is rank 8, the last is rank 1.
    for (row, rank_text) in placement.split('/').take(8).enumerate() {
        let rank = 7_usize.saturating_sub(row);
        let mut file = 0_usize;
        for symbol in rank_text.chars() {
            if let Some(skip) = symbol.to_digit(10) {
                file += skip as usize;
            } else if symbol.is_ascii_alphabetic() && file < 8 {
                if let Some(slot) = squares.get_mut(rank * 8 + file) {
                    *slot = Some(symbol);
                }
                file += 1;
            }
        }
    }
    squares
}

/// Render the 8x8 board grid for a snapshot.
///
/// Squares are emitted newest-rank first, mirroring the upstream grid
/// order: index 63 (h8) down to index 0 (a1). Each square carries its
/// index in a `data-square` attribute so the client can wire clicks.
#[must_use]
pub fn board_fragment(snapshot: &BoardSnapshot) -> String {
    let pieces = piece_map(snapshot);
    let mut html = String::from(r#"<div class="chessboard">"#);

    for square in (0..SQUARE_COUNT).rev() {
        let shade = if (square / 8 + square) % 2 == 0 {
            "light"
        } else {
            "dark"
        };
        html.push_str(&format!(
            r#"<div class="square {shade}" data-square="{square}">"#
        ));
        if let Some(Some(piece)) = pieces.get(usize::from(square)) {
            let name = piece.to_ascii_lowercase();
            let suffix = if piece.is_ascii_uppercase() { 'l' } else { 'd' };
            html.push_str(&format!(
                r#"<img class="chess_img" src="/static/img/chess/pieces/{name}{suffix}.svg">"#
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}

/// Render the full room view: header, opponent card with its hint or
/// banner, the board grid, and the viewer's card.
#[must_use]
pub fn view(
    room: &str,
    snapshot: &BoardSnapshot,
    player: &str,
    opponent_thinking: bool,
    game_over: Option<&str>,
) -> String {
    let mut html = String::from(r#"<main id="main">"#);
    html.push_str(&format!(r#"<div class="room-name">Room {room}</div>"#));

    html.push_str(r#"<div id="opponent" class="player-card">"#);
    html.push_str(r#"<div class="player-bubble">Opponent</div>"#);
    if let Some(message) = game_over {
        html.push_str(&format!(
            r#"<div class="game-over">Game over: {message}</div>"#
        ));
    } else if opponent_thinking {
        html.push_str(r#"<div class="game-info">Opponent thinking...</div>"#);
    }
    html.push_str("</div>");

    html.push_str(&board_fragment(snapshot));

    html.push_str(&format!(
        r#"<div id="player" class="player-card"><div class="player-bubble">{player}</div></div>"#
    ));
    html.push_str("</main>");
    html
}
