mod notification_repository_it;
