//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::Bytes;
use i1905_utils::mac_addr::MacAddr;

use crate::packet::CmduHeader;

// Upper bound on concurrently reassembled messages.
pub const MAX_CONTEXTS: usize = 32;

// CMDU reassembly registry.
//
// One registry serves all sockets of an AL node. It is owned by the
// transport and passed explicitly so that tests can construct isolated
// instances. All operations are synchronous and complete in bounded time.
#[derive(Debug)]
pub struct Defragmenter {
    timeout: Duration,
    strict: bool,
    contexts: HashMap<(MacAddr, u16), Context>,
}

// Partially reassembled message.
#[derive(Debug)]
struct Context {
    // Header of the first fragment.
    hdr: CmduHeader,
    fragments: Vec<Bytes>,
    next_fragment_id: u8,
    deadline: Instant,
}

// ===== impl Defragmenter =====

impl Defragmenter {
    pub fn new(timeout: Duration, strict: bool) -> Defragmenter {
        Defragmenter {
            timeout,
            strict,
            contexts: HashMap::new(),
        }
    }

    // Feeds one fragment into the registry.
    //
    // Returns the first-fragment header together with the ordered fragment
    // payloads once the message is complete. Fragments are accepted only as
    // a contiguous run of fragment ids starting at zero; duplicates are
    // dropped idempotently, and a gap drops the fragment (or the whole
    // context in strict mode).
    pub fn push(
        &mut self,
        hdr: &CmduHeader,
        payload: Bytes,
    ) -> Option<(CmduHeader, Vec<Bytes>)> {
        self.purge_expired(Instant::now());

        // Fast path: unfragmented message.
        if hdr.fragment_id == 0 && hdr.last_fragment {
            return Some((*hdr, vec![payload]));
        }

        let key = (hdr.src_addr, hdr.message_id);
        match self.contexts.get_mut(&key) {
            None => {
                // A new context starts at fragment zero.
                if hdr.fragment_id != 0 {
                    return None;
                }
                if self.contexts.len() >= MAX_CONTEXTS {
                    self.evict_oldest();
                }
                self.contexts.insert(
                    key,
                    Context {
                        hdr: *hdr,
                        fragments: vec![payload],
                        next_fragment_id: 1,
                        deadline: Instant::now() + self.timeout,
                    },
                );
                None
            }
            Some(context) => {
                // Duplicate fragments are idempotent.
                if hdr.fragment_id < context.next_fragment_id {
                    return None;
                }
                // Out-of-order fragment.
                if hdr.fragment_id > context.next_fragment_id {
                    if self.strict {
                        self.contexts.remove(&key);
                    }
                    return None;
                }

                context.fragments.push(payload);
                context.next_fragment_id += 1;
                context.deadline = Instant::now() + self.timeout;

                if hdr.last_fragment {
                    let context = self.contexts.remove(&key).unwrap();
                    return Some((context.hdr, context.fragments));
                }
                None
            }
        }
    }

    // Drops every context whose deadline has passed.
    pub fn purge_expired(&mut self, now: Instant) {
        self.contexts.retain(|_, context| context.deadline > now);
    }

    // Returns the number of partially reassembled messages.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    fn evict_oldest(&mut self) {
        if let Some(key) = self
            .contexts
            .iter()
            .min_by_key(|(_, context)| context.deadline)
            .map(|(key, _)| *key)
        {
            self.contexts.remove(&key);
        }
    }
}
