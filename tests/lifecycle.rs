mod common;

use common::*;
use hotel_bookings::models::{
    Amount, BookingStatus, PaymentMethod, PaymentStatus, ProcessPayment, RoomStatus, UpdateBooking,
};
use hotel_bookings::AppError;

fn cash(booking_id: i64, amount: f64) -> ProcessPayment {
    ProcessPayment {
        booking_id,
        amount: Amount::from_float(amount),
        payment_method: PaymentMethod::Cash,
        transaction_id: None,
    }
}

#[actix_web::test]
async fn stay_from_reservation_to_payment() {
    let (pool, state) = setup().await;
    let room = add_room(&state, "R101", 100.0).await;
    let guest = add_guest(&state, "Ada", "Lovelace").await;

    let b1 = state
        .lifecycle
        .create(guest.id, room.id, date("2024-01-01"), date("2024-01-03"))
        .await
        .unwrap();
    assert_eq!(b1.status, BookingStatus::Confirmed);
    assert_eq!(b1.total_amount, Amount::from_float(200.0));
    assert_eq!(b1.payment_status, PaymentStatus::Unpaid);
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);
    assert_occupancy_consistent(&pool).await;

    let b1 = state.lifecycle.check_in(b1.id).await.unwrap();
    assert_eq!(b1.status, BookingStatus::CheckedIn);
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);

    let err = state.lifecycle.check_in(b1.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);

    let b1 = state.lifecycle.check_out(b1.id).await.unwrap();
    assert_eq!(b1.status, BookingStatus::CheckedOut);
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Available);
    assert_occupancy_consistent(&pool).await;

    let (_, status) = state.payments.record(cash(b1.id, 200.0)).await.unwrap();
    assert_eq!(status, PaymentStatus::Paid);
    let details = state.bookings.get_by_id(b1.id).await.unwrap();
    assert_eq!(details.payment_status, PaymentStatus::Paid);
    assert_eq!(details.paid_amount, Amount::from_float(200.0));
    assert_eq!(details.status, BookingStatus::CheckedOut);
}

#[actix_web::test]
async fn cancelled_booking_cannot_be_checked_out() {
    let (pool, state) = setup().await;
    let room = add_room(&state, "R101", 100.0).await;
    let guest = add_guest(&state, "Grace", "Hopper").await;

    let b2 = state
        .lifecycle
        .create(guest.id, room.id, date("2024-02-01"), date("2024-02-02"))
        .await
        .unwrap();
    assert_eq!(b2.total_amount, Amount::from_float(100.0));
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);

    let b2 = state.lifecycle.cancel(b2.id).await.unwrap();
    assert_eq!(b2.status, BookingStatus::Cancelled);
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Available);

    let err = state.lifecycle.check_out(b2.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Available);
    assert_occupancy_consistent(&pool).await;
}

#[actix_web::test]
async fn inverted_dates_are_rejected_without_side_effects() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R102", 80.0).await;
    let guest = add_guest(&state, "Alan", "Turing").await;

    for (check_in, check_out) in [("2024-03-05", "2024-03-05"), ("2024-03-05", "2024-03-01")] {
        let err = state
            .lifecycle
            .create(guest.id, room.id, date(check_in), date(check_out))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err:?}");
    }

    assert_eq!(room_status(&state, room.id).await, RoomStatus::Available);
    assert!(state.bookings.list_all().await.unwrap().is_empty());
}

#[actix_web::test]
async fn check_out_requires_checked_in() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R103", 90.0).await;
    let guest = add_guest(&state, "Edsger", "Dijkstra").await;

    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-04-01"), date("2024-04-04"))
        .await
        .unwrap();

    let err = state.lifecycle.check_out(booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);

    let stored = state.bookings.get_by_id(booking.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
}

#[actix_web::test]
async fn second_cancel_fails_and_does_not_free_the_room_again() {
    let (pool, state) = setup().await;
    let room = add_room(&state, "R104", 120.0).await;
    let guest = add_guest(&state, "Barbara", "Liskov").await;

    let first = state
        .lifecycle
        .create(guest.id, room.id, date("2024-05-01"), date("2024-05-03"))
        .await
        .unwrap();
    state.lifecycle.cancel(first.id).await.unwrap();

    // the room is booked again before the stale cancel arrives
    let second = state
        .lifecycle
        .create(guest.id, room.id, date("2024-05-10"), date("2024-05-12"))
        .await
        .unwrap();
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);

    let err = state.lifecycle.cancel(first.id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Occupied);

    let stored = state.bookings.get_by_id(second.id).await.unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
    assert_occupancy_consistent(&pool).await;
}

#[actix_web::test]
async fn cancel_from_checked_in_releases_room() {
    let (pool, state) = setup().await;
    let room = add_room(&state, "R105", 150.0).await;
    let guest = add_guest(&state, "Donald", "Knuth").await;

    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-06-01"), date("2024-06-02"))
        .await
        .unwrap();
    state.lifecycle.check_in(booking.id).await.unwrap();

    let booking = state.lifecycle.cancel(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Available);
    assert_occupancy_consistent(&pool).await;
}

#[actix_web::test]
async fn occupied_or_maintenance_room_cannot_be_booked() {
    let (pool, state) = setup().await;
    let busy = add_room(&state, "R201", 100.0).await;
    let closed = add_room(&state, "R202", 100.0).await;
    let guest = add_guest(&state, "Ken", "Thompson").await;

    state
        .lifecycle
        .create(guest.id, busy.id, date("2024-07-01"), date("2024-07-05"))
        .await
        .unwrap();
    let err = state
        .lifecycle
        .create(guest.id, busy.id, date("2024-08-01"), date("2024-08-05"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");

    state
        .rooms
        .set_housekeeping_status(closed.id, RoomStatus::Maintenance)
        .await
        .unwrap();
    let err = state
        .lifecycle
        .create(guest.id, closed.id, date("2024-07-01"), date("2024-07-05"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err:?}");
    assert_eq!(room_status(&state, closed.id).await, RoomStatus::Maintenance);

    assert_eq!(state.bookings.list_all().await.unwrap().len(), 1);
    assert_occupancy_consistent(&pool).await;
}

#[actix_web::test]
async fn unknown_guest_rolls_back_room_occupancy() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R301", 100.0).await;

    let err = state
        .lifecycle
        .create(9_999, room.id, date("2024-01-01"), date("2024-01-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Guest")), "{err:?}");
    assert_eq!(room_status(&state, room.id).await, RoomStatus::Available);
}

#[actix_web::test]
async fn unknown_room_and_booking_are_not_found() {
    let (_pool, state) = setup().await;
    let guest = add_guest(&state, "Niklaus", "Wirth").await;

    let err = state
        .lifecycle
        .create(guest.id, 42, date("2024-01-01"), date("2024-01-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Room")), "{err:?}");

    for result in [
        state.lifecycle.check_in(7).await,
        state.lifecycle.check_out(7).await,
        state.lifecycle.cancel(7).await,
    ] {
        assert!(matches!(result, Err(AppError::NotFound("Booking"))));
    }
}

#[actix_web::test]
async fn payment_status_tracks_cumulative_payments() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R401", 100.0).await;
    let guest = add_guest(&state, "Margaret", "Hamilton").await;
    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-09-01"), date("2024-09-03"))
        .await
        .unwrap();

    let (_, status) = state.payments.record(cash(booking.id, 50.0)).await.unwrap();
    assert_eq!(status, PaymentStatus::Partial);

    let card = ProcessPayment {
        booking_id: booking.id,
        amount: Amount::from_float(100.0),
        payment_method: PaymentMethod::Card,
        transaction_id: Some("txn-001".to_string()),
    };
    let (_, status) = state.payments.record(card).await.unwrap();
    assert_eq!(status, PaymentStatus::Partial);

    let (_, status) = state.payments.record(cash(booking.id, 50.0)).await.unwrap();
    assert_eq!(status, PaymentStatus::Paid);

    let payments = state.payments.list_by_booking(booking.id).await.unwrap();
    assert_eq!(payments.len(), 3);
    assert!(payments[0].id > payments[2].id, "most recent first");
    assert_eq!(payments[1].transaction_id.as_deref(), Some("txn-001"));
}

#[actix_web::test]
async fn overpayment_and_bad_payments_are_rejected() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R402", 100.0).await;
    let guest = add_guest(&state, "Frances", "Allen").await;
    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-09-01"), date("2024-09-02"))
        .await
        .unwrap();

    state.payments.record(cash(booking.id, 60.0)).await.unwrap();

    let err = state.payments.record(cash(booking.id, 40.01)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    let err = state.payments.record(cash(booking.id, 0.0)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    let transfer = ProcessPayment {
        booking_id: booking.id,
        amount: Amount::from_float(10.0),
        payment_method: PaymentMethod::Transfer,
        transaction_id: Some("   ".to_string()),
    };
    let err = state.payments.record(transfer).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    let err = state.payments.record(cash(999, 10.0)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Booking")), "{err:?}");

    let details = state.bookings.get_by_id(booking.id).await.unwrap();
    assert_eq!(details.payment_status, PaymentStatus::Partial);
    assert_eq!(details.paid_amount, Amount::from_float(60.0));
    assert_eq!(state.payments.list_by_booking(booking.id).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn update_only_while_confirmed() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R501", 100.0).await;
    let guest = add_guest(&state, "John", "Backus").await;
    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-10-01"), date("2024-10-03"))
        .await
        .unwrap();

    let updated = state
        .bookings
        .update(
            booking.id,
            UpdateBooking {
                check_out: Some(date("2024-10-04")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.check_out, date("2024-10-04"));
    assert_eq!(updated.nights(), 3);
    // the total is kept unless the caller sends a new one
    assert_eq!(updated.total_amount, Amount::from_float(200.0));

    let err = state
        .bookings
        .update(
            booking.id,
            UpdateBooking {
                check_in: Some(date("2024-10-05")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    state.lifecycle.check_in(booking.id).await.unwrap();
    let err = state
        .bookings
        .update(
            booking.id,
            UpdateBooking {
                total_amount: Some(Amount::from_float(250.0)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
}

#[actix_web::test]
async fn changing_the_total_rederives_payment_status() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R502", 100.0).await;
    let guest = add_guest(&state, "Barbara", "Liskov").await;
    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-10-10"), date("2024-10-12"))
        .await
        .unwrap();

    let (_, status) = state.payments.record(cash(booking.id, 200.0)).await.unwrap();
    assert_eq!(status, PaymentStatus::Paid);

    let raise = UpdateBooking {
        total_amount: Some(Amount::from_float(500.0)),
        ..Default::default()
    };
    let updated = state.bookings.update(booking.id, raise).await.unwrap();
    assert_eq!(updated.total_amount, Amount::from_float(500.0));
    assert_eq!(updated.payment_status, PaymentStatus::Partial);

    let lower = UpdateBooking {
        total_amount: Some(Amount::from_float(50.0)),
        ..Default::default()
    };
    let err = state.bookings.update(booking.id, lower).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    let back = UpdateBooking {
        total_amount: Some(Amount::from_float(200.0)),
        ..Default::default()
    };
    let updated = state.bookings.update(booking.id, back).await.unwrap();
    assert_eq!(updated.payment_status, PaymentStatus::Paid);

    let details = state.bookings.get_by_id(booking.id).await.unwrap();
    assert_eq!(details.total_amount, Amount::from_float(200.0));
    assert_eq!(details.paid_amount, Amount::from_float(200.0));
    assert_eq!(details.payment_status, PaymentStatus::Paid);
}

#[actix_web::test]
async fn oversized_amounts_never_reach_the_ledger() {
    let (_pool, state) = setup().await;
    let room = add_room(&state, "R503", 100.0).await;
    let guest = add_guest(&state, "Edsger", "Dijkstra").await;
    let booking = state
        .lifecycle
        .create(guest.id, room.id, date("2024-10-20"), date("2024-10-22"))
        .await
        .unwrap();
    state.payments.record(cash(booking.id, 50.0)).await.unwrap();

    let body = format!(
        r#"{{"booking_id": {}, "amount": 1e300, "payment_method": "cash"}}"#,
        booking.id
    );
    assert!(serde_json::from_str::<ProcessPayment>(&body).is_err());

    let err = state
        .payments
        .record(cash(booking.id, Amount::MAX.to_float()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");

    let details = state.bookings.get_by_id(booking.id).await.unwrap();
    assert_eq!(details.paid_amount, Amount::from_float(50.0));
    assert_eq!(details.payment_status, PaymentStatus::Partial);

    let mansion = add_room(&state, "R504", Amount::MAX.to_float()).await;
    let err = state
        .lifecycle
        .create(guest.id, mansion.id, date("2024-01-01"), chrono::NaiveDate::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "{err:?}");
    assert_eq!(room_status(&state, mansion.id).await, RoomStatus::Available);
}

#[actix_web::test]
async fn search_and_filter() {
    let (_pool, state) = setup().await;
    let r1 = add_room(&state, "R601", 100.0).await;
    let r2 = add_room(&state, "R602", 100.0).await;
    let ada = add_guest(&state, "Ada", "Lovelace").await;
    let alan = add_guest(&state, "Alan", "Turing").await;

    let b1 = state
        .lifecycle
        .create(ada.id, r1.id, date("2024-11-01"), date("2024-11-02"))
        .await
        .unwrap();
    let b2 = state
        .lifecycle
        .create(alan.id, r2.id, date("2024-11-01"), date("2024-11-02"))
        .await
        .unwrap();
    state.lifecycle.check_in(b2.id).await.unwrap();

    let found = state.bookings.search("LOVE").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, b1.id);

    let found = state.bookings.search("r60").await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, b2.id, "most recent first");

    assert!(state.bookings.search("%").await.unwrap().is_empty());

    let checked_in = state
        .bookings
        .filter_by_status(BookingStatus::CheckedIn)
        .await
        .unwrap();
    assert_eq!(checked_in.len(), 1);
    assert_eq!(checked_in[0].room_number, "R602");
}
