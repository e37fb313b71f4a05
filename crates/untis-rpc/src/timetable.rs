//! Timetable retrieval and lesson normalization.

use chrono::{NaiveDate, NaiveDateTime};
use untis_core::packed::{decode_date, decode_time, format_date};
use untis_core::{Lesson, PersonType, ReferenceKind};

use crate::context::CallContext;
use crate::error::RpcError;
use crate::session::Session;
use crate::wire::{TimetableParams, TimetableRecord, element_ids};

impl Session {
    /// Lessons of element `element_id` of type `person_type` between `start`
    /// and `end` (inclusive), in the order the service returned them.
    ///
    /// Class, teacher and room ids are resolved to names per record. Any
    /// failure aborts the whole retrieval.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotAuthenticated`] before any network call,
    /// [`RpcError::MalformedResponse`] for undecodable packed dates or times,
    /// plus any transport, correlation or resolution error.
    pub async fn timetable(
        &mut self,
        ctx: &CallContext,
        element_id: i64,
        person_type: PersonType,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Lesson>, RpcError> {
        self.ensure_authenticated()?;

        let params = TimetableParams {
            id: element_id,
            element_type: person_type.code(),
            start_date: format_date(&start),
            end_date: format_date(&end),
        };
        let records: Vec<TimetableRecord> = self.call(ctx, "getTimetable", &params).await?;
        tracing::debug!(
            element_id,
            %person_type,
            %start,
            %end,
            count = records.len(),
            "fetched timetable"
        );

        let mut lessons = Vec::with_capacity(records.len());
        for record in records {
            lessons.push(self.build_lesson(ctx, record).await?);
        }
        Ok(lessons)
    }

    /// Timetable of the logged-in person.
    ///
    /// # Errors
    ///
    /// See [`Self::timetable`].
    pub async fn timetable_for_self(
        &mut self,
        ctx: &CallContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Lesson>, RpcError> {
        self.ensure_authenticated()?;
        let (id, person_type) = (self.person_id(), self.person_type());
        self.timetable(ctx, id, person_type, start, end).await
    }

    /// Timetable of the class with short name `class_name`.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotFound`] if the class does not exist, otherwise see
    /// [`Self::timetable`].
    pub async fn timetable_for_class(
        &mut self,
        ctx: &CallContext,
        start: NaiveDate,
        end: NaiveDate,
        class_name: &str,
    ) -> Result<Vec<Lesson>, RpcError> {
        let id = self.resolve_class_id(ctx, class_name).await?;
        self.timetable(ctx, id, PersonType::Class, start, end).await
    }

    /// Timetable of the teacher named `"<forename> <SURNAME>"`.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotFound`] if the teacher does not exist, otherwise see
    /// [`Self::timetable`].
    pub async fn timetable_for_teacher(
        &mut self,
        ctx: &CallContext,
        start: NaiveDate,
        end: NaiveDate,
        display_name: &str,
    ) -> Result<Vec<Lesson>, RpcError> {
        let id = self.resolve_teacher_id(ctx, display_name).await?;
        self.timetable(ctx, id, PersonType::Teacher, start, end).await
    }

    async fn build_lesson(
        &mut self,
        ctx: &CallContext,
        record: TimetableRecord,
    ) -> Result<Lesson, RpcError> {
        let date = decode_date(record.date)?;
        let start = NaiveDateTime::new(date, decode_time(record.start_time)?).and_utc();
        let end = NaiveDateTime::new(date, decode_time(record.end_time)?).and_utc();

        let class_ids = element_ids(&record.kl);
        let teacher_ids = element_ids(&record.te);
        let room_ids = element_ids(&record.ro);

        let classes = self
            .resolve_names(ctx, ReferenceKind::Class, &class_ids)
            .await?;
        let teachers = self
            .resolve_names(ctx, ReferenceKind::Teacher, &teacher_ids)
            .await?;
        let rooms = self
            .resolve_names(ctx, ReferenceKind::Room, &room_ids)
            .await?;

        Ok(Lesson {
            lesson_id: record.id,
            start,
            end,
            class_ids,
            classes: classes.names,
            teacher_ids,
            teachers: teachers.names,
            room_ids,
            rooms: rooms.names,
            subject_ids: element_ids(&record.su),
        })
    }
}
