//! Property tests run against every storage backend.
//!
//! Random event streams are replayed in lockstep on one book per backend.
//! After every step the books must agree with each other and with a plain
//! list of the orders that should still be resting.
//!
//! ```bash
//! PROPTEST_CASES=2000 cargo test --test backends
//! ```

use proptest::prelude::*;
use proptest::sample::Index;

use pricebook::types::{Order, OrderId, Price, Quantity, Side};
use pricebook::{Backend, BookConfig, Error, LimitOrderBook};

#[derive(Debug, Clone)]
enum Op {
    Add {
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    Cancel(Index),
    Amend(Index, Quantity),
    CancelMissing(Price),
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

/// Narrow range so that orders share levels often
fn arb_price() -> impl Strategy<Value = Price> {
    90i64..110
}

fn arb_quantity() -> impl Strategy<Value = Quantity> {
    1u64..1_000
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        5 => (arb_side(), arb_price(), arb_quantity())
            .prop_map(|(side, price, quantity)| Op::Add { side, price, quantity }),
        2 => any::<Index>().prop_map(Op::Cancel),
        2 => (any::<Index>(), arb_quantity()).prop_map(|(i, q)| Op::Amend(i, q)),
        1 => arb_price().prop_map(Op::CancelMissing),
    ]
}

fn books(max_depth: Option<usize>) -> Vec<LimitOrderBook> {
    Backend::ALL
        .into_iter()
        .map(|backend| {
            let config = BookConfig::new("PROP")
                .with_backend(backend)
                .with_max_depth(max_depth);
            LimitOrderBook::new(config).unwrap()
        })
        .collect()
}

/// Apply the same call to every book and require identical results
fn all_agree<T, F>(books: &mut [LimitOrderBook], mut f: F) -> Result<T, TestCaseError>
where
    T: PartialEq + std::fmt::Debug,
    F: FnMut(&mut LimitOrderBook) -> T,
{
    let mut results = books.iter_mut().map(|b| (b.backend(), f(b)));
    let (first_backend, first) = results.next().unwrap();
    for (backend, result) in results {
        prop_assert_eq!(&result, &first, "{} disagrees with {}", backend, first_backend);
    }
    Ok(first)
}

fn check_invariants(
    book: &LimitOrderBook,
    live: &[Order],
    max_depth: Option<usize>,
) -> Result<(), TestCaseError> {
    let backend = book.backend();
    prop_assert_eq!(book.len(), live.len(), "{}", backend);

    for side in [Side::Bid, Side::Ask] {
        let levels = book.depth(side, usize::MAX);

        // Strictly best-first, so the head is the best price.
        for pair in levels.windows(2) {
            prop_assert!(side.is_better(pair[0].price, pair[1].price), "{}", backend);
        }
        let expected_best = live
            .iter()
            .filter(|o| o.side == side)
            .map(|o| o.price)
            .min_by_key(|&p| std::cmp::Reverse(side.rank(p)));
        prop_assert_eq!(levels.first().map(|l| l.price), expected_best, "{}", backend);

        for summary in &levels {
            let level = book.side(side).level(summary.price).unwrap();
            let sum: Quantity = level.orders().map(|o| o.quantity).sum();
            prop_assert_eq!(summary.quantity, sum, "{}", backend);
            prop_assert!(summary.order_count > 0, "{}", backend);
        }

        if let Some(max) = max_depth {
            prop_assert!(levels.len() <= max, "{}", backend);
        }
    }

    for order in live {
        prop_assert_eq!(book.order(order.id), Some(order), "{}", backend);
    }
    Ok(())
}

fn replay(ops: Vec<Op>, max_depth: Option<usize>) -> Result<(), TestCaseError> {
    let mut books = books(max_depth);
    let mut live: Vec<Order> = Vec::new();
    let mut next_id = 1u64;

    for op in ops {
        match op {
            Op::Add {
                side,
                price,
                quantity,
            } => {
                let order = Order::new(next_id, side, price, quantity);
                next_id += 1;
                let result = all_agree(&mut books, |b| b.add_order(order))?;
                let eviction = result.map_err(|e| TestCaseError::fail(e.to_string()))?;

                live.push(order);
                if let Some(eviction) = eviction {
                    prop_assert_eq!(eviction.side, side);
                    live.retain(|o| !eviction.contains(o.id));
                }
            }
            Op::Cancel(index) => {
                if live.is_empty() {
                    continue;
                }
                let order = live.remove(index.index(live.len()));
                let result =
                    all_agree(&mut books, |b| b.cancel_order(order.id, order.side, order.price))?;
                prop_assert_eq!(result, Ok(order));
            }
            Op::Amend(index, quantity) => {
                if live.is_empty() {
                    continue;
                }
                let i = index.index(live.len());
                let order = live[i];
                let result = all_agree(&mut books, |b| {
                    b.amend_order(order.id, order.side, order.price, quantity)
                })?;
                prop_assert_eq!(result, Ok(order.with_quantity(quantity)));

                // Amending sends the order to the back of its level.
                live.remove(i);
                live.push(order.with_quantity(quantity));
            }
            Op::CancelMissing(price) => {
                let before = books[0].snapshot(usize::MAX);
                let missing = OrderId(u64::MAX);
                let result = all_agree(&mut books, |b| b.cancel_order(missing, Side::Bid, price))?;
                prop_assert_eq!(
                    result,
                    Err(Error::NotFound {
                        id: missing,
                        price
                    })
                );
                prop_assert_eq!(books[0].snapshot(usize::MAX), before);
            }
        }

        all_agree(&mut books, |b| b.snapshot(usize::MAX))?;
        for book in &books {
            check_invariants(book, &live, max_depth)?;
        }
    }

    // Queue order within each level must match arrival order too.
    for order in &live {
        let expected: Vec<_> = live
            .iter()
            .filter(|o| o.side == order.side && o.price == order.price)
            .map(|o| o.id)
            .collect();
        for book in &books {
            let ids: Vec<_> = book
                .orders_at(order.side, order.price)
                .iter()
                .map(|o| o.id)
                .collect();
            prop_assert_eq!(&ids, &expected, "{}", book.backend());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_unbounded_backends_agree(ops in prop::collection::vec(arb_op(), 1..200)) {
        replay(ops, None)?;
    }

    #[test]
    fn prop_bounded_backends_agree(
        ops in prop::collection::vec(arb_op(), 1..200),
        max_depth in 1usize..6,
    ) {
        replay(ops, Some(max_depth))?;
    }

    #[test]
    fn prop_add_then_cancel_restores_snapshot(
        setup in prop::collection::vec((arb_side(), arb_price(), arb_quantity()), 0..40),
        side in arb_side(),
        price in arb_price(),
        quantity in arb_quantity(),
    ) {
        for mut book in books(None) {
            for (i, &(s, p, q)) in setup.iter().enumerate() {
                book.add_order(Order::new(i as u64 + 1, s, p, q)).unwrap();
            }
            let before = book.snapshot(usize::MAX);

            let id = OrderId(10_000);
            book.add_order(Order::new(id, side, price, quantity)).unwrap();
            prop_assert_ne!(book.snapshot(usize::MAX), before.clone());
            book.cancel_order(id, side, price).unwrap();

            prop_assert_eq!(book.snapshot(usize::MAX), before, "{}", book.backend());
        }
    }

    #[test]
    fn prop_rejections_do_not_mutate(
        setup in prop::collection::vec((arb_side(), arb_price(), arb_quantity()), 1..40),
        price in arb_price(),
    ) {
        for mut book in books(Some(3)) {
            for (i, &(s, p, q)) in setup.iter().enumerate() {
                book.add_order(Order::new(i as u64 + 1, s, p, q)).unwrap();
            }
            let before = book.snapshot(usize::MAX);
            let len = book.len();

            prop_assert_eq!(book.add_order(Order::bid(99, price, 0)), Err(Error::InvalidQuantity(0)));
            prop_assert_eq!(book.add_order(Order::ask(99, -price, 1)), Err(Error::InvalidPrice(-price)));
            prop_assert_eq!(
                book.amend_order(OrderId(99), Side::Bid, price, 5),
                Err(Error::NotFound { id: OrderId(99), price })
            );
            if let Some(resting) = book.depth(Side::Ask, 1).first() {
                let id = book.orders_at(Side::Ask, resting.price)[0].id;
                prop_assert_eq!(book.add_order(Order::bid(id, price, 1)), Err(Error::DuplicateId(id)));
                prop_assert_eq!(
                    book.amend_order(id, Side::Ask, resting.price, 0),
                    Err(Error::InvalidQuantity(0))
                );
            }

            prop_assert_eq!(book.snapshot(usize::MAX), before, "{}", book.backend());
            prop_assert_eq!(book.len(), len);
        }
    }
}
