// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Repeatedly drops every item the container is the sole owner of.
///
/// Dropping one item can release references it held on other items of the same
/// container (a view keeps its texture alive, for instance), so the pass is
/// repeated until a full sweep removes nothing. Returns the number of purged items;
/// whatever is left in `items` is still referenced from outside.
pub fn purge_unshared<T>(items: &mut Vec<T>, is_unshared: impl Fn(&T) -> bool) -> usize {
    let mut purged = 0;
    loop {
        let before = items.len();
        // Items are removed one at a time so a drop is observed by the next check.
        let mut index = 0;
        while index < items.len() {
            if is_unshared(&items[index]) {
                drop(items.swap_remove(index));
            } else {
                index += 1;
            }
        }
        let removed = before - items.len();
        purged += removed;
        if removed == 0 {
            return purged;
        }
    }
}
