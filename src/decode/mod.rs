//! Turns a packed hex schematic into a per-column node-classification state
//! machine and, in the same pass, emits the motion graph's nodes and arcs.

pub mod error;

use log::debug;

use error::DecodeError;

use crate::coordinate::{Coordinate, Move};
use crate::graph::Graph;

const BIT_MASKS: [u8; 4] = [0b1000, 0b0100, 0b0010, 0b0001];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Void,
    Solid,
    NewNode,
    TwoWay,
    OneWay,
}

impl Tag {
    /// Right-shifts the tag one state, the way a non-solid voxel ages the
    /// column's classification toward `OneWay`. `Void` never ages this
    /// way — it only leaves `Void` when a solid voxel is seen.
    fn update(self) -> Tag {
        match self {
            Tag::Void => Tag::Void,
            Tag::Solid => Tag::NewNode,
            Tag::NewNode => Tag::TwoWay,
            Tag::TwoWay => Tag::OneWay,
            Tag::OneWay => Tag::OneWay,
        }
    }

    fn has_adjacency(self) -> bool {
        matches!(self, Tag::NewNode | Tag::TwoWay | Tag::OneWay)
    }
}

/// The decoded extents and resulting motion graph.
pub struct Decoded {
    pub graph: Graph,
    pub x_size: i32,
    pub y_size: i32,
    pub z_size: i32,
}

/// Parses a `.vox` body (already-loaded bytes, no file I/O here) into a
/// motion graph. The header gives world extents; the z=0 layer is the
/// floor and emits no nodes, matching the convention that the agent
/// always stands on something.
pub fn decode(bytes: &[u8]) -> Result<Decoded, DecodeError> {
    debug!("decoding schematic body ({} bytes)", bytes.len());

    let text = std::str::from_utf8(bytes)
        .map_err(|_| DecodeError::TruncatedHeader("input is not valid UTF-8".to_string()))?;
    let mut tokens = text.split_whitespace();

    let x_size = next_extent(&mut tokens, "X")?;
    let y_size = next_extent(&mut tokens, "Y")?;
    let z_size = next_extent(&mut tokens, "Z")?;

    let row_len = (x_size as usize).div_ceil(4);
    let mut tags = vec![Tag::Void; (x_size as usize) * (y_size as usize)];

    // Layer 0: the floor. Only seeds solidity, no node ever stands here.
    for row_idx in 0..y_size as usize {
        let row = next_row(&mut tokens, 0, row_idx)?;
        let bits = row_bits(row, row_len, x_size as usize, 0, row_idx)?;
        for (x, solid) in bits.into_iter().enumerate() {
            tags[row_idx * x_size as usize + x] = if solid { Tag::Solid } else { Tag::Void };
        }
    }

    let mut graph = Graph::new();

    for z in 1..z_size {
        for row_idx in 0..y_size as usize {
            let row = next_row(&mut tokens, z as usize, row_idx)?;
            let bits = row_bits(row, row_len, x_size as usize, z as usize, row_idx)?;

            for (x, solid) in bits.into_iter().enumerate() {
                let idx = row_idx * x_size as usize + x;
                if solid {
                    tags[idx] = Tag::Solid;
                    continue;
                }
                if tags[idx] == Tag::Void {
                    continue;
                }
                tags[idx] = tags[idx].update();

                let position = Coordinate::new(x as i32, row_idx as i32, z);
                emit(&mut graph, &tags, idx, position, x, row_idx, x_size as usize);
            }
        }
    }

    debug!("decoded {} nodes over {x_size}x{y_size}x{z_size}", graph.node_count());
    Ok(Decoded { graph, x_size, y_size, z_size })
}

fn emit(graph: &mut Graph, tags: &[Tag], idx: usize, position: Coordinate, x: usize, row_idx: usize, x_size: usize) {
    match tags[idx] {
        Tag::NewNode => {
            let here = graph.place_node(position);

            if x != 0 {
                let west_tag = tags[idx - 1];
                if west_tag.has_adjacency() {
                    let landing = graph.land(position.west());
                    let landing_id = graph.node_at(landing).expect("land() always finds an existing node");
                    graph.link(here, landing_id, Move::West);
                    if west_tag != Tag::OneWay {
                        graph.link(landing_id, here, Move::East);
                    }
                }
            }
            if row_idx != 0 {
                let north_tag = tags[idx - x_size];
                if north_tag.has_adjacency() {
                    let landing = graph.land(position.north());
                    let landing_id = graph.node_at(landing).expect("land() always finds an existing node");
                    graph.link(here, landing_id, Move::North);
                    if north_tag != Tag::OneWay {
                        graph.link(landing_id, here, Move::South);
                    }
                }
            }
        }
        Tag::TwoWay => {
            let u = graph
                .node_at(position.down())
                .expect("TWO_WAY implies a node one layer below");

            if x != 0 && tags[idx - 1] == Tag::NewNode {
                let v = graph
                    .node_at(position.west())
                    .expect("west neighbour just tagged NEW_NODE this layer");
                graph.link(u, v, Move::West);
                graph.link(v, u, Move::East);
            }
            if row_idx != 0 && tags[idx - x_size] == Tag::NewNode {
                let v = graph
                    .node_at(position.north())
                    .expect("north neighbour just tagged NEW_NODE this layer");
                graph.link(u, v, Move::North);
                graph.link(v, u, Move::South);
            }
        }
        Tag::OneWay => {
            let landing = graph.land(position.down().down());
            let u = graph.node_at(landing).expect("land() always finds an existing node");

            if x != 0 && tags[idx - 1] == Tag::NewNode {
                let v = graph
                    .node_at(position.west())
                    .expect("west neighbour just tagged NEW_NODE this layer");
                graph.link(v, u, Move::East);
            }
            if row_idx != 0 && tags[idx - x_size] == Tag::NewNode {
                let v = graph
                    .node_at(position.north())
                    .expect("north neighbour just tagged NEW_NODE this layer");
                graph.link(v, u, Move::South);
            }
        }
        Tag::Void | Tag::Solid => {}
    }
}

fn next_extent<'a>(tokens: &mut impl Iterator<Item = &'a str>, name: &str) -> Result<i32, DecodeError> {
    let token = tokens
        .next()
        .ok_or_else(|| DecodeError::TruncatedHeader(format!("missing {name} extent")))?;
    token
        .parse::<i32>()
        .map_err(|_| DecodeError::BadExtent(token.to_string()))
}

fn next_row<'a>(tokens: &mut impl Iterator<Item = &'a str>, layer: usize, row: usize) -> Result<&'a str, DecodeError> {
    tokens
        .next()
        .ok_or(DecodeError::RowLength { layer, row, got: 0, expected: 0 })
}

fn row_bits(row: &str, expected_len: usize, x_size: usize, layer: usize, row_idx: usize) -> Result<Vec<bool>, DecodeError> {
    let chars: Vec<char> = row.chars().collect();
    if chars.len() != expected_len {
        return Err(DecodeError::RowLength { layer, row: row_idx, got: chars.len(), expected: expected_len });
    }

    let mut bits = Vec::with_capacity(x_size);
    for ch in chars {
        let value = hex_value(ch).ok_or(DecodeError::BadHexDigit { layer, row: row_idx, ch })?;
        for mask in BIT_MASKS {
            if bits.len() == x_size {
                break;
            }
            bits.push(value & mask != 0);
        }
    }
    Ok(bits)
}

fn hex_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn flat_floor_emits_a_walkable_row() {
        let world = b"4 1 2\nf\n0\n";
        let decoded = decode(world).unwrap();
        assert_eq!(decoded.graph.node_count(), 4);
        assert_eq!(decoded.x_size, 4);
        assert_eq!(decoded.y_size, 1);
        assert_eq!(decoded.z_size, 2);
    }

    #[test]
    fn bad_hex_digit_is_rejected() {
        let world = b"4 1 2\nf\nz\n";
        assert!(matches!(decode(world), Err(DecodeError::BadHexDigit { .. })));
    }

    #[test]
    fn short_row_is_rejected() {
        let world = b"4 1 2\nf\n00\n";
        assert!(matches!(decode(world), Err(DecodeError::RowLength { .. })));
    }

    #[test]
    fn missing_extent_is_rejected() {
        let world = b"4 1\nf\n0\n";
        assert!(matches!(decode(world), Err(DecodeError::BadExtent(_))));
    }

    #[test]
    fn one_way_column_emits_a_single_directed_arc() {
        // col0 stays solid until the last layer, then opens in lock-step
        // with col1 ageing TWO_WAY -> ONE_WAY, driving the Tag::OneWay arm
        // of `emit`: col0's brand-new node links into col1's own node,
        // one-directional only.
        let world = b"4 1 4\nf\n8\n8\n0\n";
        let decoded = decode(world).unwrap();
        assert_eq!(decoded.graph.node_count(), 4);

        let v = decoded.graph.node_at(Coordinate::new(0, 0, 3)).unwrap();
        let n1 = decoded.graph.node_at(Coordinate::new(1, 0, 1)).unwrap();

        assert_eq!(decoded.graph.outgoing(v).count(), 1);
        assert_eq!(decoded.graph.outgoing(v).next().unwrap().to, n1);
        assert_eq!(decoded.graph.incoming(v).count(), 0);

        // the link runs v -> n1 only; n1 has no arc back to v.
        assert!(decoded.graph.outgoing(n1).all(|arc| arc.to != v));
    }
}
